//! 模板化建议
//!
//! 按年龄、性别和生活方式生成训练计划与饮食建议，不依赖模型。

/// 是否为活跃生活方式
fn is_active(lifestyle: &str) -> bool {
    lifestyle.trim().eq_ignore_ascii_case("active")
}

/// 训练计划
pub fn workout_plan(age: u32, gender: &str, lifestyle: &str) -> String {
    let mut plan = format!(
        "As a {age}-year-old {gender} with a {lifestyle} lifestyle, your workout plan should include:\n"
    );
    if is_active(lifestyle) {
        plan.push_str("- High-intensity interval training (HIIT)\n- Strength training 4 times a week");
    } else {
        plan.push_str("- Moderate aerobic exercises\n- Light strength training 2 times a week");
    }
    plan
}

/// 饮食建议
pub fn diet_tips(age: u32, lifestyle: &str) -> String {
    let mut tips = format!(
        "For a {age}-year-old with a {lifestyle} lifestyle, consider the following diet tips:\n"
    );
    if is_active(lifestyle) {
        tips.push_str("- Increase protein intake\n- Stay hydrated\n- Balance carbs and fats");
    } else {
        tips.push_str(
            "- Incorporate more fruits and vegetables\n- Reduce sugar intake\n- Stay hydrated",
        );
    }
    tips
}
