use crate::core::Pipeline;
use crate::utils::error::Result;

/// Runs one pipeline's extract, transform and load steps in order. Nothing
/// is written unless both earlier steps succeed.
pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub fn run(&self) -> Result<String> {
        let name = self.pipeline.name();
        tracing::info!("[{}] starting", name);

        tracing::debug!("[{}] extracting", name);
        let extracted = self.pipeline.extract()?;

        tracing::debug!("[{}] transforming", name);
        let transformed = self.pipeline.transform(extracted)?;

        tracing::debug!("[{}] loading", name);
        let output_path = self.pipeline.load(transformed)?;
        tracing::info!("[{}] output saved to {}", name, output_path);

        Ok(output_path)
    }
}
