//! Training loop and checkpointing.

use crate::distributed::DistributedContext;
use crate::error::TrainResult;
use candle_core::{DType, Device, Module, Tensor, D};
use candle_nn::{loss, Optimizer, VarMap, SGD};
use mlforge_cloud::ObjectStore;
use std::sync::Arc;

/// Drives training steps and owns checkpoint uploads.
///
/// The model and optimizer stay with the caller; the trainer contributes
/// the device, the distributed-mode decision, and the checkpoint store.
pub struct DistributedTrainer {
    device: Device,
    context: Option<DistributedContext>,
    store: Arc<dyn ObjectStore>,
    checkpoint_bucket: String,
}

impl DistributedTrainer {
    /// Pick the device (accelerator if available) and read the launcher
    /// environment for distributed mode.
    pub fn from_env(store: Arc<dyn ObjectStore>, checkpoint_bucket: &str) -> TrainResult<Self> {
        let device = Device::cuda_if_available(0)?;
        let context = DistributedContext::from_env(&device);
        if let Some(ctx) = &context {
            tracing::info!(
                "distributed mode: rank {} of {} over {:?}",
                ctx.rank,
                ctx.world_size,
                ctx.backend
            );
        }
        Ok(Self::new(device, context, store, checkpoint_bucket))
    }

    #[must_use]
    pub fn new(
        device: Device,
        context: Option<DistributedContext>,
        store: Arc<dyn ObjectStore>,
        checkpoint_bucket: &str,
    ) -> Self {
        Self { device, context, store, checkpoint_bucket: checkpoint_bucket.to_string() }
    }

    #[must_use]
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// True when this process should perform group-wide side effects.
    #[must_use]
    pub fn is_coordinator(&self) -> bool {
        self.context.as_ref().map_or(true, DistributedContext::is_coordinator)
    }

    /// One optimization step: forward, cross-entropy, backward, update.
    pub fn train_step<M: Module>(
        &self,
        model: &M,
        images: &Tensor,
        labels: &Tensor,
        optimizer: &mut SGD,
    ) -> TrainResult<f32> {
        let logits = model.forward(images)?;
        let loss = loss::cross_entropy(&logits, labels)?;
        optimizer.backward_step(&loss)?;
        Ok(loss.to_scalar::<f32>()?)
    }

    /// Run every batch through [`Self::train_step`]; returns the mean loss.
    pub fn train_epoch<M: Module>(
        &self,
        model: &M,
        batches: &[(Tensor, Tensor)],
        optimizer: &mut SGD,
    ) -> TrainResult<f32> {
        let mut total = 0f32;
        for (images, labels) in batches {
            total += self.train_step(model, images, labels, optimizer)?;
        }
        Ok(if batches.is_empty() { 0.0 } else { total / batches.len() as f32 })
    }

    /// Evaluate without gradient updates. Returns (mean loss, accuracy %).
    pub fn validate<M: Module>(
        &self,
        model: &M,
        batches: &[(Tensor, Tensor)],
    ) -> TrainResult<(f32, f32)> {
        let mut total_loss = 0f32;
        let mut correct = 0f32;
        let mut seen = 0f32;
        for (images, labels) in batches {
            let logits = model.forward(images)?;
            total_loss += loss::cross_entropy(&logits, labels)?.to_scalar::<f32>()?;
            let predictions = logits.argmax(D::Minus1)?;
            correct += predictions
                .eq(labels)?
                .to_dtype(DType::F32)?
                .sum_all()?
                .to_scalar::<f32>()?;
            seen += labels.dims1()? as f32;
        }
        let mean_loss = if batches.is_empty() { 0.0 } else { total_loss / batches.len() as f32 };
        let accuracy = if seen == 0.0 { 0.0 } else { 100.0 * correct / seen };
        Ok((mean_loss, accuracy))
    }

    /// Serialize the parameters to a temp file and upload them as
    /// `checkpoints/epoch_<n>.safetensors`. Only the coordinator uploads;
    /// other ranks return `None`. The local copy is removed either way.
    pub async fn save_checkpoint(
        &self,
        varmap: &VarMap,
        epoch: u32,
    ) -> TrainResult<Option<String>> {
        if !self.is_coordinator() {
            return Ok(None);
        }
        let dir = tempfile::tempdir()?;
        let filename = format!("epoch_{epoch}.safetensors");
        let path = dir.path().join(&filename);
        varmap.save(&path)?;
        let key = format!("checkpoints/{filename}");
        self.store.upload_file(&path, &self.checkpoint_bucket, &key).await?;
        tracing::info!("uploaded checkpoint {}/{key}", self.checkpoint_bucket);
        Ok(Some(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributed::CollectiveBackend;
    use candle_nn::{Linear, VarBuilder};
    use mlforge_cloud::InMemoryCloud;

    const CLASSES: usize = 3;
    const FEATURES: usize = 4;

    fn model_and_varmap() -> (Linear, VarMap) {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let model = candle_nn::linear(FEATURES, CLASSES, vb.pp("fc")).unwrap();
        (model, varmap)
    }

    fn batch(len: usize) -> (Tensor, Tensor) {
        let images = Tensor::rand(-1f32, 1f32, (len, FEATURES), &Device::Cpu).unwrap();
        let labels: Vec<u32> = (0..len).map(|i| (i % CLASSES) as u32).collect();
        let labels = Tensor::from_vec(labels, len, &Device::Cpu).unwrap();
        (images, labels)
    }

    fn trainer(context: Option<DistributedContext>) -> (Arc<InMemoryCloud>, DistributedTrainer) {
        let cloud = Arc::new(InMemoryCloud::new());
        let trainer = DistributedTrainer::new(
            Device::Cpu,
            context,
            Arc::clone(&cloud) as Arc<dyn ObjectStore>,
            "ckpt",
        );
        (cloud, trainer)
    }

    #[test]
    fn test_train_step_returns_finite_loss() {
        let (model, varmap) = model_and_varmap();
        let mut optimizer = SGD::new(varmap.all_vars(), 0.01).unwrap();
        let (_cloud, trainer) = trainer(None);
        let (images, labels) = batch(4);
        let loss = trainer.train_step(&model, &images, &labels, &mut optimizer).unwrap();
        assert!(loss.is_finite());
    }

    #[test]
    fn test_train_epoch_averages_batch_losses() {
        let (model, varmap) = model_and_varmap();
        let mut optimizer = SGD::new(varmap.all_vars(), 0.01).unwrap();
        let (_cloud, trainer) = trainer(None);
        let batches = vec![batch(4), batch(4)];
        let mean = trainer.train_epoch(&model, &batches, &mut optimizer).unwrap();
        assert!(mean.is_finite());
        assert!(trainer.train_epoch(&model, &[], &mut optimizer).unwrap() == 0.0);
    }

    #[test]
    fn test_validate_reports_loss_and_accuracy() {
        let (model, _varmap) = model_and_varmap();
        let (_cloud, trainer) = trainer(None);
        let batches = vec![batch(6)];
        let (loss, accuracy) = trainer.validate(&model, &batches).unwrap();
        assert!(loss.is_finite());
        assert!((0.0..=100.0).contains(&accuracy));
    }

    #[tokio::test]
    async fn test_checkpoint_uploads_on_coordinator() {
        let (_model, varmap) = model_and_varmap();
        let (cloud, trainer) = trainer(None);
        cloud.create_bucket("ckpt").await.unwrap();

        let key = trainer.save_checkpoint(&varmap, 3).await.unwrap();
        assert_eq!(key.as_deref(), Some("checkpoints/epoch_3.safetensors"));
        let body = cloud.get_object("ckpt", "checkpoints/epoch_3.safetensors").await.unwrap();
        assert!(!body.is_empty());
    }

    #[tokio::test]
    async fn test_checkpoint_skipped_on_other_ranks() {
        let (_model, varmap) = model_and_varmap();
        let context =
            DistributedContext { rank: 1, world_size: 2, backend: CollectiveBackend::Gloo };
        let (cloud, trainer) = trainer(Some(context));
        cloud.create_bucket("ckpt").await.unwrap();

        let key = trainer.save_checkpoint(&varmap, 3).await.unwrap();
        assert_eq!(key, None);
        assert_eq!(cloud.object_count("ckpt"), 0);
    }

    #[tokio::test]
    async fn test_checkpoint_uploads_on_rank_zero_in_distributed_mode() {
        let (_model, varmap) = model_and_varmap();
        let context =
            DistributedContext { rank: 0, world_size: 2, backend: CollectiveBackend::Gloo };
        let (cloud, trainer) = trainer(Some(context));
        cloud.create_bucket("ckpt").await.unwrap();

        let key = trainer.save_checkpoint(&varmap, 1).await.unwrap();
        assert!(key.is_some());
        assert_eq!(cloud.object_count("ckpt"), 1);
    }
}
