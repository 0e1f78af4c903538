use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 健身目标
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FitnessGoal {
    /// 减脂
    WeightLoss,
    /// 增肌
    BuildMuscle,
    /// 耐力
    Endurance,
    /// 综合健身
    GeneralFitness,
}

impl FitnessGoal {
    /// 选项顺序与交互菜单一致
    pub const ALL: [FitnessGoal; 4] = [
        FitnessGoal::WeightLoss,
        FitnessGoal::BuildMuscle,
        FitnessGoal::Endurance,
        FitnessGoal::GeneralFitness,
    ];

    /// 展示名称，会原样插入提示词
    pub fn label(&self) -> &'static str {
        match self {
            FitnessGoal::WeightLoss => "Weight Loss",
            FitnessGoal::BuildMuscle => "Build Muscle",
            FitnessGoal::Endurance => "Endurance",
            FitnessGoal::GeneralFitness => "General Fitness",
        }
    }
}

impl fmt::Display for FitnessGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FitnessGoal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        Self::ALL
            .into_iter()
            .find(|goal| normalize(goal.label()) == normalized)
            .ok_or_else(|| format!("unknown fitness goal: {s}"))
    }
}

/// 训练经验
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 3] = [
        ExperienceLevel::Beginner,
        ExperienceLevel::Intermediate,
        ExperienceLevel::Advanced,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "Beginner",
            ExperienceLevel::Intermediate => "Intermediate",
            ExperienceLevel::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExperienceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        Self::ALL
            .into_iter()
            .find(|level| normalize(level.label()) == normalized)
            .ok_or_else(|| format!("unknown experience level: {s}"))
    }
}

/// "Weight Loss"、"weight_loss"、"weight-loss" 视为同一选项
fn normalize(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// 用户偏好
///
/// 每个会话采集一次，之后不可变。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserPreferences {
    /// 主要目标
    pub goal: FitnessGoal,
    /// 经验水平
    pub experience: ExperienceLevel,
    /// 伤病或限制（自由文本，可为空）
    #[serde(default)]
    pub restrictions: String,
}

impl UserPreferences {
    pub fn new(goal: FitnessGoal, experience: ExperienceLevel, restrictions: &str) -> Self {
        Self {
            goal,
            experience,
            restrictions: restrictions.to_string(),
        }
    }
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self::new(FitnessGoal::WeightLoss, ExperienceLevel::Beginner, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Weight Loss", FitnessGoal::WeightLoss)]
    #[case("weight_loss", FitnessGoal::WeightLoss)]
    #[case("build-muscle", FitnessGoal::BuildMuscle)]
    #[case(" ENDURANCE ", FitnessGoal::Endurance)]
    #[case("generalfitness", FitnessGoal::GeneralFitness)]
    fn test_goal_from_str(#[case] input: &str, #[case] expected: FitnessGoal) {
        assert_eq!(input.parse::<FitnessGoal>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_values_are_rejected() {
        assert!("flexibility".parse::<FitnessGoal>().is_err());
        assert!("expert".parse::<ExperienceLevel>().is_err());
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let prefs = UserPreferences::new(FitnessGoal::BuildMuscle, ExperienceLevel::Advanced, "bad knee");
        let json = serde_json::to_value(&prefs).unwrap();
        assert_eq!(json["goal"], "build_muscle");
        assert_eq!(json["experience"], "advanced");

        let parsed: UserPreferences =
            serde_json::from_str(r#"{"goal":"endurance","experience":"beginner"}"#).unwrap();
        assert_eq!(parsed.restrictions, "");
    }
}
