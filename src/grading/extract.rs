//! 从模型回复中提取评分结果
//!
//! 只看第一个 `{`，用深度计数找到与之匹配的 `}`，字符串字面量内部的括号
//! （包括转义引号之后的）不计入深度。取出的子串严格按
//! `{"score": number, "feedback": string}` 解码，分数必须落在 `[0, total_points]`。
//! 任何一步失败都返回 `MalformedResponse`，不做猜测或补默认值。

use serde::Deserialize;

use crate::errors::{ClassroomError, Result};
use crate::models::grading::entities::GradingResult;

#[derive(Debug, Deserialize)]
struct RawGrading {
    score: f64,
    feedback: String,
}

/// 返回回复中第一个完整的 JSON 对象子串
pub fn extract_json_object(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let bytes = &reply.as_bytes()[start..];

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, byte) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if *byte == b'\\' {
                escaped = true;
            } else if *byte == b'"' {
                in_string = false;
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&reply[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    None
}

/// 解析模型回复
pub fn parse_grading_reply(reply: &str, total_points: f64) -> Result<GradingResult> {
    let object = extract_json_object(reply).ok_or_else(|| {
        ClassroomError::malformed_response("回复中没有完整的 JSON 对象")
    })?;

    let raw: RawGrading = serde_json::from_str(object).map_err(|e| {
        ClassroomError::malformed_response(format!("评分 JSON 解码失败: {e}"))
    })?;

    if !raw.score.is_finite() || raw.score < 0.0 || raw.score > total_points {
        return Err(ClassroomError::malformed_response(format!(
            "分数 {} 超出范围 [0, {}]",
            raw.score, total_points
        )));
    }

    Ok(GradingResult {
        score: raw.score,
        feedback: raw.feedback,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_malformed(reply: &str) {
        let err = parse_grading_reply(reply, 100.0).unwrap_err();
        assert!(
            matches!(err, ClassroomError::MalformedResponse(_)),
            "expected MalformedResponse for {reply:?}, got {err:?}"
        );
    }

    #[test]
    fn test_plain_object() {
        let result = parse_grading_reply(r#"{"score": 85, "feedback": "Solid work"}"#, 100.0)
            .unwrap();
        assert_eq!(result.score, 85.0);
        assert_eq!(result.feedback, "Solid work");
    }

    #[test]
    fn test_object_wrapped_in_prose() {
        let reply = "Here is my grading:\n```json\n{\"score\": 7.5, \"feedback\": \"Good\"}\n```\nHope it helps!";
        let result = parse_grading_reply(reply, 10.0).unwrap();
        assert_eq!(result.score, 7.5);
        assert_eq!(result.feedback, "Good");
    }

    #[test]
    fn test_only_first_object_is_used() {
        // 贪婪匹配会吞到最后一个 `}`
        let reply = r#"{"score": 60, "feedback": "ok"} Note: see {rubric} above."#;
        let result = parse_grading_reply(reply, 100.0).unwrap();
        assert_eq!(result.score, 60.0);
    }

    #[test]
    fn test_braces_inside_strings() {
        let reply = r#"{"score": 90, "feedback": "Close the } and open { properly, e.g. \"}\""}"#;
        let object = extract_json_object(reply).unwrap();
        assert_eq!(object, reply);

        let result = parse_grading_reply(reply, 100.0).unwrap();
        assert_eq!(result.feedback, r#"Close the } and open { properly, e.g. "}""#);
    }

    #[test]
    fn test_nested_object_and_extra_fields() {
        let reply = r#"{"score": 3, "feedback": "fine", "rubric": {"clarity": 1}} trailing"#;
        let result = parse_grading_reply(reply, 5.0).unwrap();
        assert_eq!(result.score, 3.0);
    }

    #[test]
    fn test_escaped_backslash_before_quote() {
        let reply = r#"{"score": 1, "feedback": "path C:\\"} }"#;
        assert_eq!(
            extract_json_object(reply).unwrap(),
            r#"{"score": 1, "feedback": "path C:\\"}"#
        );
    }

    #[test]
    fn test_no_object() {
        assert_malformed("I would give this an 85 out of 100.");
        assert_malformed("");
    }

    #[test]
    fn test_unclosed_object() {
        assert_malformed(r#"{"score": 85, "feedback": "cut off"#);
    }

    #[test]
    fn test_trailing_comma() {
        assert_malformed(r#"{"score": 85, "feedback": "Nice",}"#);
    }

    #[test]
    fn test_wrong_types() {
        assert_malformed(r#"{"score": "85", "feedback": "Nice"}"#);
        assert_malformed(r#"{"score": 85, "feedback": 3}"#);
        assert_malformed(r#"{"score": 85}"#);
        assert_malformed(r#"{"feedback": "Nice"}"#);
    }

    #[test]
    fn test_score_out_of_range() {
        assert_malformed(r#"{"score": 101, "feedback": "Too generous"}"#);
        assert_malformed(r#"{"score": -1, "feedback": "Too harsh"}"#);
        assert!(parse_grading_reply(r#"{"score": 0, "feedback": "Empty"}"#, 100.0).is_ok());
        assert!(parse_grading_reply(r#"{"score": 100, "feedback": "Perfect"}"#, 100.0).is_ok());
    }
}
