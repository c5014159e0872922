use crate::{Operator, Result, Sample};

/// Base trait for filter operators
/// Filters reduce the number of rows based on a condition
pub trait BaseFilter: Operator {
    /// Decide whether the sample survives this filter
    fn keep(&self, sample: &Sample) -> Result<bool>;

    /// Helper method to apply filter
    fn apply_filter(&self, sample: Sample) -> Result<Option<Sample>> {
        if self.keep(&sample)? {
            Ok(Some(sample))
        } else {
            Ok(None)
        }
    }
}

/// Base trait for annotator operators
/// Annotators add new columns without changing row count
pub trait BaseAnnotator: Operator {
    /// Write the derived columns onto the sample
    fn annotate(&self, sample: &mut Sample) -> Result<()>;

    /// Helper method to apply annotation
    fn apply_annotation(&self, mut sample: Sample) -> Result<Option<Sample>> {
        self.annotate(&mut sample)?;
        Ok(Some(sample))
    }
}

/// Macro to automatically implement Operator for BaseFilter types
/// Usage: impl_filter_operator!(MyFilter);
#[macro_export]
macro_rules! impl_filter_operator {
    ($type:ty) => {
        impl $crate::Operator for $type {
            fn process(&self, sample: $crate::Sample) -> $crate::Result<Option<$crate::Sample>> {
                <$type as $crate::base::BaseFilter>::apply_filter(self, sample)
            }
        }
    };
}

/// Macro to automatically implement Operator for BaseAnnotator types
/// Usage: impl_annotator_operator!(MyAnnotator);
#[macro_export]
macro_rules! impl_annotator_operator {
    ($type:ty) => {
        impl $crate::Operator for $type {
            fn process(&self, sample: $crate::Sample) -> $crate::Result<Option<$crate::Sample>> {
                <$type as $crate::base::BaseAnnotator>::apply_annotation(self, sample)
            }
        }
    };
}
