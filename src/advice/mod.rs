pub mod catalog;
pub mod category;
pub mod generator;
pub mod rules;

pub use catalog::AdviceCatalog;
pub use category::AdviceCategory;
pub use generator::{AdviceConfig, AdviceGenerator, AdviceItem, AdviceResult};
pub use rules::{rule_for, AdviceRule, AggregateStats, ADVICE_RULES};
