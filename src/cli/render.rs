use crate::models::session::Transcript;

/// 渲染完整会话记录：先按顺序列出问答，再逐轮列出 WER
pub fn render_transcript(transcript: &Transcript) -> String {
    let mut out = String::new();

    for turn in transcript.turns() {
        out.push_str(&format!("You: {}\nBot: {}\n", turn.query, turn.response));
    }

    for (index, metric) in transcript.metrics().iter().enumerate() {
        out.push_str(&format!(
            "Interaction {} Metrics:\n- WER Score: {:.2}\n",
            index + 1,
            metric.wer
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::turn::{Metric, Turn, TurnStatus};

    #[test]
    fn test_render_transcript() {
        let mut transcript = Transcript::new();
        transcript.record(
            Turn::new(1, "How many push-ups?", "Start with ten.", TurnStatus::Answered),
            Metric::new(0.0, 1.0),
        );
        transcript.record(
            Turn::new(2, "And squats?", "Fifteen.", TurnStatus::Answered),
            Metric::new(0.0, 0.666),
        );

        let expected = "You: How many push-ups?\n\
                        Bot: Start with ten.\n\
                        You: And squats?\n\
                        Bot: Fifteen.\n\
                        Interaction 1 Metrics:\n\
                        - WER Score: 1.00\n\
                        Interaction 2 Metrics:\n\
                        - WER Score: 0.67\n";
        assert_eq!(render_transcript(&transcript), expected);
    }

    #[test]
    fn test_render_empty_transcript() {
        assert!(render_transcript(&Transcript::new()).is_empty());
    }
}
