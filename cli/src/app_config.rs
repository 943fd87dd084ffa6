pub struct AppConfig {
    pub sample_rate: u32,
    pub bpm: Option<f32>,
    pub gate_seconds: f32,
    pub buffer_seconds: f32,
    pub seed: Option<u64>,
}

impl AppConfig {
    pub fn new(sample_rate: u32, buffer_seconds: f32) -> Self {
        AppConfig {
            sample_rate,
            bpm: None,
            gate_seconds: 0.005,
            buffer_seconds,
            seed: None,
        }
    }

    pub fn nova_config(self: &Self, sample_rate: u32) -> nova::Config {
        nova::Config {
            seed: self.seed,
            ..nova::Config::with_capacity_seconds(self.buffer_seconds, sample_rate)
        }
    }
}
