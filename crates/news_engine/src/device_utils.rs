use candle_core::Device;

/// Pick the inference device. CUDA is only tried when the crate is built
/// with the `cuda` feature and `use_gpu` is set; everything else runs on CPU.
pub fn select_device(use_gpu: bool) -> Device {
    if !use_gpu {
        return Device::Cpu;
    }

    #[cfg(feature = "cuda")]
    {
        match Device::cuda_if_available(0) {
            Ok(device) => return device,
            Err(e) => {
                tracing::warn!("Failed to initialize CUDA device 0, falling back to CPU: {}", e);
            }
        }
    }

    Device::Cpu
}
