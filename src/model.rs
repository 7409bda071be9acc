use burn::{
    config::Config,
    module::Module,
    nn::{
        conv::Conv2dConfig,
        pool::MaxPool2dConfig,
        Initializer, LinearConfig, PaddingConfig2d, Relu,
    },
    tensor::{backend::Backend, Tensor},
};

use crate::error::ClassifierError;
use crate::stage::{FeatureStage, HeadStage};

/// Expected input channel count.
const IN_CHANNELS: usize = 3;
/// Expected input height.
const IN_HEIGHT: usize = 64;
/// Expected input width.
const IN_WIDTH: usize = 64;

/// Flattened feature count after the extractor: 8 channels on a 16x16 map.
const NUM_FEATURES: usize = 8 * 16 * 16;
/// Width of the hidden layer in the decision head.
const HIDDEN_SIZE: usize = 32;

/// Configuration to create a [Classifier] using the [init function](ClassifierConfig::init).
#[derive(Config, Debug)]
pub struct ClassifierConfig {
    /// The number of output classes.
    #[config(default = 10)]
    pub num_classes: usize,
    /// The type of function used to initialize convolution and linear parameters.
    #[config(
        default = "Initializer::KaimingUniform{gain:1.0/3.0f64.sqrt(),fan_out_only:false}"
    )]
    pub initializer: Initializer,
}

/// Convolutional classifier for `[batch, 3, 64, 64]` color images.
///
/// Two ordered stage pipelines with an explicit flatten in between: a
/// feature extractor of convolution/activation/pooling stages, then a
/// decision head of affine/activation stages. The output is raw logits;
/// normalization is left to the caller's loss function.
///
/// Should be created with [ClassifierConfig].
#[derive(Module, Debug)]
pub struct Classifier<B: Backend> {
    features: Vec<FeatureStage<B>>,
    head: Vec<HeadStage<B>>,
    num_classes: usize,
}

impl ClassifierConfig {
    /// Initialize a new [classifier](Classifier) module.
    ///
    /// # Errors
    ///
    /// Returns [ClassifierError::InvalidConfiguration] when `num_classes`
    /// is zero.
    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<Classifier<B>, ClassifierError> {
        if self.num_classes == 0 {
            return Err(ClassifierError::InvalidConfiguration {
                num_classes: self.num_classes,
            });
        }

        // Input is [batch, 3, 64, 64].
        let features = vec![
            // [batch, 4, 64, 64]
            FeatureStage::Conv(
                Conv2dConfig::new([IN_CHANNELS, 4], [3, 3])
                    .with_padding(PaddingConfig2d::Explicit(1, 1))
                    .with_initializer(self.initializer.clone())
                    .init(device),
            ),
            FeatureStage::Activation(Relu::new()),
            // [batch, 4, 32, 32]
            FeatureStage::Pool(MaxPool2dConfig::new([2, 2]).with_strides([2, 2]).init()),
            // [batch, 8, 32, 32]
            FeatureStage::Conv(
                Conv2dConfig::new([4, 8], [3, 3])
                    .with_padding(PaddingConfig2d::Explicit(1, 1))
                    .with_initializer(self.initializer.clone())
                    .init(device),
            ),
            FeatureStage::Activation(Relu::new()),
            // [batch, 8, 16, 16]
            FeatureStage::Pool(MaxPool2dConfig::new([2, 2]).with_strides([2, 2]).init()),
        ];

        // Input is reshaped to [batch, 8 * 16 * 16].
        let head = vec![
            // [batch, 32]
            HeadStage::Affine(
                LinearConfig::new(NUM_FEATURES, HIDDEN_SIZE)
                    .with_initializer(self.initializer.clone())
                    .init(device),
            ),
            HeadStage::Activation(Relu::new()),
            // [batch, num_classes]
            HeadStage::Affine(
                LinearConfig::new(HIDDEN_SIZE, self.num_classes)
                    .with_initializer(self.initializer.clone())
                    .init(device),
            ),
        ];

        log::debug!(
            "initialized classifier: {} feature stages, {} head stages, {} classes",
            features.len(),
            head.len(),
            self.num_classes,
        );

        Ok(Classifier {
            features,
            head,
            num_classes: self.num_classes,
        })
    }
}

impl<B: Backend> Classifier<B> {
    /// Applies the forward pass on the input tensor.
    ///
    /// The output holds unnormalized class scores (logits); no softmax is
    /// applied. Parameters are read-only during the pass, so repeated calls
    /// with the same input produce the same output.
    ///
    /// # Shapes
    ///
    /// - input: `[batch_size, 3, 64, 64]`
    /// - output: `[batch_size, num_classes]`
    ///
    /// # Errors
    ///
    /// Returns [ClassifierError::ShapeMismatch] when the input's channel or
    /// spatial dimensions differ from `[3, 64, 64]`. The batch dimension is
    /// unconstrained.
    pub fn forward(&self, input: Tensor<B, 4>) -> Result<Tensor<B, 2>, ClassifierError> {
        let [_batch_size, channels, height, width] = input.dims();
        if [channels, height, width] != [IN_CHANNELS, IN_HEIGHT, IN_WIDTH] {
            return Err(ClassifierError::ShapeMismatch {
                expected: [IN_CHANNELS, IN_HEIGHT, IN_WIDTH],
                found: [channels, height, width],
            });
        }

        let mut x = input;
        for stage in self.features.iter() {
            x = stage.forward(x);
        }

        let mut x = flatten_features(x);
        for stage in self.head.iter() {
            x = stage.forward(x);
        }

        Ok(x)
    }

    /// The number of output classes.
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }
}

/// Collapses the channel and spatial axes of a feature map into a single
/// feature axis, in channel-major order: `[batch, c, h, w]` becomes
/// `[batch, c * h * w]`.
///
/// The ordering is part of the contract: head parameters are only
/// compatible with features flattened this way.
fn flatten_features<B: Backend>(features: Tensor<B, 4>) -> Tensor<B, 2> {
    features.flatten(1, 3)
}
