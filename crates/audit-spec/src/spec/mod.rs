pub mod question;
pub mod rule;
pub mod template;

pub use question::{Constraint, QuestionSpec, QuestionType};
pub use rule::{ConditionRule, ConditionType, RuleAction};
pub use template::{ScoringRules, SectionSpec, TemplateSpec};
