//! Object-store-backed image dataset.
//!
//! Items are (image tensor, label) pairs. The label comes from the parent
//! directory of the object key: the trailing digits of `class_7` in
//! `train/class_7/img.jpg` give label 7. Images are decoded, resized to
//! 224x224, and normalized with the ImageNet channel statistics,
//! channel-first f32.

use crate::error::{TrainError, TrainResult};
use candle_core::{DType, Device, Tensor};
use mlforge_cloud::ObjectStore;
use std::sync::Arc;

const SIDE: usize = 224;
const MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const STD: [f32; 3] = [0.229, 0.224, 0.225];

/// What to do when the listing fails or matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyPolicy {
    /// Substitute a single synthetic sample and keep going. Every
    /// substitution is logged.
    SyntheticPlaceholder,
    /// Propagate the error.
    Fail,
}

#[derive(Debug, Clone)]
enum Item {
    Remote(String),
    Synthetic,
}

/// Dataset over one bucket/prefix listing.
pub struct ObjectStoreDataset {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    items: Vec<Item>,
    policy: EmptyPolicy,
    device: Device,
}

fn parse_label(key: &str) -> Option<u32> {
    let parent = key.rsplit('/').nth(1)?;
    let digits = parent.chars().rev().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    parent[parent.len() - digits..].parse().ok()
}

fn synthetic_image(device: &Device) -> TrainResult<Tensor> {
    Ok(Tensor::zeros((3, SIDE, SIDE), DType::F32, device)?)
}

fn decode_image(bytes: &[u8], device: &Device) -> TrainResult<Tensor> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| TrainError::Dataset(format!("decode: {e}")))?;
    let rgb = decoded
        .resize_exact(SIDE as u32, SIDE as u32, image::imageops::FilterType::Triangle)
        .to_rgb8();
    let mut data = vec![0f32; 3 * SIDE * SIDE];
    for (x, y, pixel) in rgb.enumerate_pixels() {
        for c in 0..3 {
            let value = f32::from(pixel[c]) / 255.0;
            data[c * SIDE * SIDE + y as usize * SIDE + x as usize] = (value - MEAN[c]) / STD[c];
        }
    }
    Ok(Tensor::from_vec(data, (3, SIDE, SIDE), device)?)
}

impl ObjectStoreDataset {
    /// List `bucket`/`prefix` and build the item index.
    ///
    /// Under [`EmptyPolicy::SyntheticPlaceholder`] a listing failure or an
    /// empty listing yields a dataset of exactly one synthetic item.
    pub async fn open(
        store: Arc<dyn ObjectStore>,
        bucket: &str,
        prefix: &str,
        policy: EmptyPolicy,
        device: Device,
    ) -> TrainResult<Self> {
        let keys = match store.list_objects(bucket, prefix).await {
            Ok(keys) => Some(keys),
            Err(err) => match policy {
                EmptyPolicy::SyntheticPlaceholder => {
                    tracing::warn!(
                        "listing {bucket}/{prefix} failed ({err}), using one synthetic sample"
                    );
                    None
                }
                EmptyPolicy::Fail => return Err(err.into()),
            },
        };

        let items = match keys {
            Some(keys) if !keys.is_empty() => keys.into_iter().map(Item::Remote).collect(),
            Some(_) => match policy {
                EmptyPolicy::SyntheticPlaceholder => {
                    tracing::warn!("no objects under {bucket}/{prefix}, using one synthetic sample");
                    vec![Item::Synthetic]
                }
                EmptyPolicy::Fail => {
                    return Err(TrainError::Dataset(format!("no objects under {bucket}/{prefix}")))
                }
            },
            None => vec![Item::Synthetic],
        };

        Ok(Self { store, bucket: bucket.to_string(), items, policy, device })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    async fn fetch_and_decode(&self, key: &str) -> TrainResult<Tensor> {
        let bytes = self.store.get_object(&self.bucket, key).await?;
        decode_image(&bytes, &self.device)
    }

    /// Fetch one item. A fetch or decode failure yields a synthetic tensor
    /// under the placeholder policy; the label is still taken from the key.
    pub async fn get(&self, index: usize) -> TrainResult<(Tensor, u32)> {
        match &self.items[index] {
            Item::Synthetic => Ok((synthetic_image(&self.device)?, 0)),
            Item::Remote(key) => {
                let label = parse_label(key).unwrap_or(0);
                match self.fetch_and_decode(key).await {
                    Ok(tensor) => Ok((tensor, label)),
                    Err(err) => match self.policy {
                        EmptyPolicy::SyntheticPlaceholder => {
                            tracing::warn!("loading {key} failed ({err}), substituting synthetic");
                            Ok((synthetic_image(&self.device)?, label))
                        }
                        EmptyPolicy::Fail => Err(err),
                    },
                }
            }
        }
    }

    /// Materialize the dataset as stacked (images, labels) batches. The
    /// last batch may be short.
    pub async fn batches(&self, batch_size: usize) -> TrainResult<Vec<(Tensor, Tensor)>> {
        let mut batches = Vec::new();
        let mut images = Vec::new();
        let mut labels: Vec<u32> = Vec::new();
        for index in 0..self.items.len() {
            let (image, label) = self.get(index).await?;
            images.push(image);
            labels.push(label);
            if images.len() == batch_size {
                batches.push(stack_batch(&mut images, &mut labels, &self.device)?);
            }
        }
        if !images.is_empty() {
            batches.push(stack_batch(&mut images, &mut labels, &self.device)?);
        }
        Ok(batches)
    }
}

/// Open the train/ and val/ datasets named by the training configuration.
/// Opts into the placeholder policy so a bare bucket still trains.
pub async fn data_loaders(
    store: Arc<dyn ObjectStore>,
    config: &mlforge_core::DeploymentConfig,
    device: &Device,
) -> TrainResult<(ObjectStoreDataset, ObjectStoreDataset)> {
    let bucket = config
        .training
        .data_bucket
        .as_deref()
        .ok_or_else(|| TrainError::Dataset("training.data_bucket is not configured".to_string()))?;
    let train = ObjectStoreDataset::open(
        Arc::clone(&store),
        bucket,
        "train/",
        EmptyPolicy::SyntheticPlaceholder,
        device.clone(),
    )
    .await?;
    let val = ObjectStoreDataset::open(
        store,
        bucket,
        "val/",
        EmptyPolicy::SyntheticPlaceholder,
        device.clone(),
    )
    .await?;
    Ok((train, val))
}

fn stack_batch(
    images: &mut Vec<Tensor>,
    labels: &mut Vec<u32>,
    device: &Device,
) -> TrainResult<(Tensor, Tensor)> {
    let stacked = Tensor::stack(images, 0)?;
    let taken = std::mem::take(labels);
    let len = taken.len();
    let labels = Tensor::from_vec(taken, len, device)?;
    images.clear();
    Ok((stacked, labels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlforge_cloud::InMemoryCloud;

    async fn store_with_objects(keys: &[&str]) -> Arc<InMemoryCloud> {
        let cloud = InMemoryCloud::new();
        cloud.create_bucket("data").await.unwrap();
        for key in keys {
            // Not a real image, so decoding falls back to synthetic.
            cloud.put_object("data", key, b"dummy data".to_vec()).await.unwrap();
        }
        Arc::new(cloud)
    }

    #[test]
    fn test_parse_label_from_parent_dir() {
        assert_eq!(parse_label("train/class_7/x.jpg"), Some(7));
        assert_eq!(parse_label("train/class_12/deep/x.jpg"), None);
        assert_eq!(parse_label("val/3/x.jpg"), Some(3));
        assert_eq!(parse_label("x.jpg"), None);
        assert_eq!(parse_label("train/class_a/x.jpg"), None);
    }

    #[tokio::test]
    async fn test_empty_prefix_placeholder_yields_one_synthetic_item() {
        let store = store_with_objects(&[]).await;
        let dataset = ObjectStoreDataset::open(
            store,
            "data",
            "train/",
            EmptyPolicy::SyntheticPlaceholder,
            Device::Cpu,
        )
        .await
        .unwrap();
        assert_eq!(dataset.len(), 1);
        let (image, label) = dataset.get(0).await.unwrap();
        assert_eq!(image.dims(), [3, 224, 224]);
        assert_eq!(label, 0);
    }

    #[tokio::test]
    async fn test_empty_prefix_fail_policy_errors() {
        let store = store_with_objects(&[]).await;
        let result =
            ObjectStoreDataset::open(store, "data", "train/", EmptyPolicy::Fail, Device::Cpu).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_listing_error_follows_policy() {
        let store = Arc::new(InMemoryCloud::new());
        let ok = ObjectStoreDataset::open(
            Arc::clone(&store) as Arc<dyn ObjectStore>,
            "missing",
            "train/",
            EmptyPolicy::SyntheticPlaceholder,
            Device::Cpu,
        )
        .await
        .unwrap();
        assert_eq!(ok.len(), 1);

        let err =
            ObjectStoreDataset::open(store, "missing", "train/", EmptyPolicy::Fail, Device::Cpu)
                .await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn test_undecodable_object_substitutes_synthetic_with_key_label() {
        let store = store_with_objects(&["train/class_5/a.jpg"]).await;
        let dataset = ObjectStoreDataset::open(
            store,
            "data",
            "train/",
            EmptyPolicy::SyntheticPlaceholder,
            Device::Cpu,
        )
        .await
        .unwrap();
        let (image, label) = dataset.get(0).await.unwrap();
        assert_eq!(image.dims(), [3, 224, 224]);
        assert_eq!(label, 5);
    }

    #[tokio::test]
    async fn test_undecodable_object_errors_under_fail_policy() {
        let store = store_with_objects(&["train/class_5/a.jpg"]).await;
        let dataset =
            ObjectStoreDataset::open(store, "data", "train/", EmptyPolicy::Fail, Device::Cpu)
                .await
                .unwrap();
        assert!(dataset.get(0).await.is_err());
    }

    #[tokio::test]
    async fn test_data_loaders_from_config() {
        let config: mlforge_core::DeploymentConfig = serde_yaml::from_str(
            r"
infrastructure:
  region: us-east-1
  storage:
    s3_bucket_prefix: p
training:
  data_bucket: data
monitoring:
  metrics: []
logging:
  cloudwatch:
    log_group: /ml/train
",
        )
        .unwrap();
        let store = store_with_objects(&["train/class_0/a.jpg"]).await;
        let (train, val) = data_loaders(store, &config, &Device::Cpu).await.unwrap();
        assert_eq!(train.len(), 1);
        // No val/ objects, so the placeholder policy kicks in.
        assert_eq!(val.len(), 1);
        assert_eq!(val.get(0).await.unwrap().1, 0);
    }

    #[tokio::test]
    async fn test_data_loaders_require_configured_bucket() {
        let config: mlforge_core::DeploymentConfig = serde_yaml::from_str(
            r"
infrastructure:
  region: us-east-1
  storage:
    s3_bucket_prefix: p
training: {}
monitoring:
  metrics: []
logging:
  cloudwatch:
    log_group: /ml/train
",
        )
        .unwrap();
        let store = store_with_objects(&[]).await;
        assert!(data_loaders(store, &config, &Device::Cpu).await.is_err());
    }

    #[tokio::test]
    async fn test_batches_stack_images_and_labels() {
        let store = store_with_objects(&[
            "train/class_0/a.jpg",
            "train/class_1/b.jpg",
            "train/class_2/c.jpg",
        ])
        .await;
        let dataset = ObjectStoreDataset::open(
            store,
            "data",
            "train/",
            EmptyPolicy::SyntheticPlaceholder,
            Device::Cpu,
        )
        .await
        .unwrap();
        let batches = dataset.batches(2).await.unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].0.dims(), [2, 3, 224, 224]);
        assert_eq!(batches[0].1.to_vec1::<u32>().unwrap(), vec![0, 1]);
        assert_eq!(batches[1].0.dims(), [1, 3, 224, 224]);
        assert_eq!(batches[1].1.to_vec1::<u32>().unwrap(), vec![2]);
    }
}
