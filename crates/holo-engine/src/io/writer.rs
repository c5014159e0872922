use holo_sdk::Sample;

/// Unified writer trait for record sinks
pub trait Writer {
    /// Write a single sample
    fn write_sample(&mut self, sample: Sample) -> anyhow::Result<()>;

    /// Close the writer and finalize the output
    /// Returns true if any data was written, false otherwise
    fn close(self: Box<Self>) -> anyhow::Result<bool>;
}

pub mod csv;
pub mod jsonl;
