use burn::{
    module::Module,
    nn::{
        conv::Conv2d,
        pool::MaxPool2d,
        Linear, Relu,
    },
    tensor::{backend::Backend, Tensor},
};

/// One stage of the feature extractor.
///
/// Every variant maps a rank-4 feature map `[batch, channels, height, width]`
/// to another rank-4 feature map. Convolutions change the channel count,
/// pooling halves the spatial extent, activations preserve the shape.
#[derive(Module, Debug)]
pub enum FeatureStage<B: Backend> {
    /// 2D convolution.
    Conv(Conv2d<B>),

    /// Elementwise rectified-linear activation.
    Activation(Relu),

    /// 2D max pooling.
    Pool(MaxPool2d),
}

impl<B: Backend> FeatureStage<B> {
    /// Applies the stage to a feature map.
    ///
    /// # Shapes
    ///
    /// - input: `[batch_size, channels_in, height_in, width_in]`
    /// - output: `[batch_size, channels_out, height_out, width_out]`
    pub fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 4> {
        match self {
            FeatureStage::Conv(conv) => conv.forward(input),
            FeatureStage::Activation(activation) => activation.forward(input),
            FeatureStage::Pool(pool) => pool.forward(input),
        }
    }
}

/// One stage of the decision head.
///
/// Every variant maps a rank-2 tensor `[batch, features]` to another rank-2
/// tensor.
#[derive(Module, Debug)]
pub enum HeadStage<B: Backend> {
    /// Affine projection.
    Affine(Linear<B>),

    /// Elementwise rectified-linear activation.
    Activation(Relu),
}

impl<B: Backend> HeadStage<B> {
    /// Applies the stage to a batch of feature vectors.
    ///
    /// # Shapes
    ///
    /// - input: `[batch_size, features_in]`
    /// - output: `[batch_size, features_out]`
    pub fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        match self {
            HeadStage::Affine(linear) => linear.forward(input),
            HeadStage::Activation(activation) => activation.forward(input),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::nn::{
        conv::Conv2dConfig,
        pool::MaxPool2dConfig,
        LinearConfig, PaddingConfig2d,
    };

    type TestBackend = burn::backend::ndarray::NdArray<f32>;

    #[test]
    fn conv_stage_maps_channels_and_preserves_spatial_extent() {
        let device = Default::default();
        let stage: FeatureStage<TestBackend> = FeatureStage::Conv(
            Conv2dConfig::new([3, 4], [3, 3])
                .with_padding(PaddingConfig2d::Explicit(1, 1))
                .init(&device),
        );

        let input = Tensor::ones([2, 3, 8, 8], &device);
        let output = stage.forward(input);

        assert_eq!(output.dims(), [2, 4, 8, 8]);
    }

    #[test]
    fn pool_stage_halves_spatial_extent() {
        let device = Default::default();
        let stage: FeatureStage<TestBackend> =
            FeatureStage::Pool(MaxPool2dConfig::new([2, 2]).with_strides([2, 2]).init());

        let input = Tensor::ones([2, 4, 8, 8], &device);
        let output = stage.forward(input);

        assert_eq!(output.dims(), [2, 4, 4, 4]);
    }

    #[test]
    fn activation_stage_clamps_negatives_and_preserves_shape() {
        let device = Default::default();
        let stage: FeatureStage<TestBackend> = FeatureStage::Activation(Relu::new());

        let input = Tensor::<TestBackend, 1>::from_floats([-1.0, 0.0, 2.0, -3.0], &device)
            .reshape([1, 1, 1, 4]);
        let output = stage.forward(input);

        assert_eq!(output.dims(), [1, 1, 1, 4]);
        output
            .to_data()
            .assert_eq(&Tensor::<TestBackend, 1>::from_floats([0.0, 0.0, 2.0, 0.0], &device)
                .reshape([1, 1, 1, 4])
                .to_data(), true);
    }

    #[test]
    fn affine_stage_projects_features() {
        let device = Default::default();
        let stage: HeadStage<TestBackend> =
            HeadStage::Affine(LinearConfig::new(16, 4).init(&device));

        let input = Tensor::ones([3, 16], &device);
        let output = stage.forward(input);

        assert_eq!(output.dims(), [3, 4]);
    }
}
