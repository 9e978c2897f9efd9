mod settings;

pub use settings::{
    ApiBackend, BudgetConfig, GenerationConfig, LecternConfig, PlannerConfig, ProviderConfig,
    RetryConfig, ValidationConfig,
};
