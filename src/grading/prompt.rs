//! 评分提示词

use crate::models::{assignments::entities::Assignment, submissions::entities::Submission};

/// 系统角色提示
pub const SYSTEM_ROLE: &str = "You are an expert teacher assistant that grades assignments fairly and provides constructive feedback.";

/// 构建评分提示词，同样的输入总是得到同样的文本
pub fn build_grading_prompt(assignment: &Assignment, submission: &Submission) -> String {
    let total = assignment.total_points;

    format!(
        "You are an expert teacher grading a student's assignment.\n\
         \n\
         Assignment: {title}\n\
         Description: {description}\n\
         Total Points: {total}\n\
         \n\
         Student Submission:\n\
         {content}\n\
         \n\
         Please grade this submission and provide:\n\
         1. A numerical score out of {total} points\n\
         2. Detailed feedback explaining the grade, including strengths and areas for improvement\n\
         3. Specific suggestions for how the student can improve\n\
         \n\
         Format your response as a JSON object with the following structure:\n\
         {{\n  \"score\": number,\n  \"feedback\": \"detailed feedback here\"\n}}\n",
        title = assignment.title,
        description = assignment.description,
        content = submission.content,
    )
}
