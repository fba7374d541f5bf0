use crate::image_classifier::interface::{ClassifierError, ImageClassifier};
use crate::image_classifier::preprocess::NormalizedTensor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum FakeBehavior {
    /// Same output for every image.
    Fixed(Vec<f32>),
    /// A softmax-like distribution seeded from the pixels, so the same image
    /// always gets the same answer.
    Seeded { num_classes: usize },
    Fail(ClassifierError),
    Slow { delay: Duration, output: Vec<f32> },
}

pub struct ImageClassifierFake {
    behavior: FakeBehavior,
    calls: AtomicUsize,
}

impl ImageClassifierFake {
    pub fn new(behavior: FakeBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn seed_from(tensor: &NormalizedTensor) -> u64 {
    let mut hasher = DefaultHasher::new();
    tensor.width().hash(&mut hasher);
    tensor.height().hash(&mut hasher);
    for value in tensor.data() {
        value.to_bits().hash(&mut hasher);
    }
    hasher.finish()
}

fn seeded_distribution(tensor: &NormalizedTensor, num_classes: usize) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed_from(tensor));
    let weights: Vec<f32> = (0..num_classes)
        .map(|_| rng.random_range(0.0f32..4.0).exp())
        .collect();
    let total: f32 = weights.iter().sum();
    weights.iter().map(|w| w / total).collect()
}

impl ImageClassifier for ImageClassifierFake {
    fn predict(&self, tensor: &NormalizedTensor) -> Result<Vec<f32>, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            FakeBehavior::Fixed(output) => Ok(output.clone()),
            FakeBehavior::Seeded { num_classes } => {
                Ok(seeded_distribution(tensor, *num_classes))
            }
            FakeBehavior::Fail(error) => Err(error.clone()),
            FakeBehavior::Slow { delay, output } => {
                std::thread::sleep(*delay);
                Ok(output.clone())
            }
        }
    }
}
