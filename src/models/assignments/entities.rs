use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 新建作业未指定分值时的默认总分
pub const DEFAULT_TOTAL_POINTS: f64 = 100.0;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Assignment {
    // 唯一 ID
    pub id: i64,
    // 关联的班级 ID
    pub class_id: i64,
    // 创建者（教师）ID，也是唯一有权评分的人
    pub created_by: i64,
    // 作业标题
    pub title: String,
    // 作业描述
    pub description: String,
    // 截止时间
    pub due_date: chrono::DateTime<chrono::Utc>,
    // 总分
    pub total_points: f64,
    // 创建时间
    pub created_at: chrono::DateTime<chrono::Utc>,
    // 更新时间
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Assignment {
    /// 分数是否落在 [0, total_points] 区间内
    pub fn accepts_score(&self, score: f64) -> bool {
        score.is_finite() && (0.0..=self.total_points).contains(&score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(total_points: f64) -> Assignment {
        Assignment {
            id: 1,
            class_id: 1,
            created_by: 1,
            title: "Essay".into(),
            description: "Write an essay".into(),
            due_date: chrono::Utc::now(),
            total_points,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_accepts_score_bounds_inclusive() {
        let a = assignment(50.0);
        assert!(a.accepts_score(0.0));
        assert!(a.accepts_score(50.0));
        assert!(a.accepts_score(37.5));
    }

    #[test]
    fn test_rejects_out_of_range_score() {
        let a = assignment(50.0);
        assert!(!a.accepts_score(-1.0));
        assert!(!a.accepts_score(50.5));
        assert!(!a.accepts_score(f64::NAN));
    }
}
