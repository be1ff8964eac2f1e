//! Prompt text sent to Gemini.

use rehearse_core::ai::{EvaluationRequest, QuestionRequest};

pub fn questions(req: &QuestionRequest) -> String {
  let category = req.category.as_str();
  let difficulty = req.difficulty.as_str();
  format!(
    "You are an interview coach for {category} interviews. Write {count} interview \
questions for a {role} position, each with a model answer.

Role: {role}
Description: {description}
Experience: {years} years
Difficulty: {difficulty}

Questions must be realistic for the role and pitched at the stated experience. \
Model answers should be complete and well structured.

Reply with JSON only, exactly {count} entries, in this shape:
{{\"questions\": [{{\"question\": \"...\", \"answer\": \"...\"}}]}}
",
    count = req.question_count,
    role = req.job_role,
    description = req.job_description,
    years = req.experience_years,
  )
}

pub fn evaluation(req: &EvaluationRequest) -> String {
  format!(
    "You are an interview evaluator. Grade the candidate's response below.

Question: {question}
Response: {response}
Role: {role}
Experience: {years} years

Judge technical accuracy, clarity, problem solving, confidence, relevance and \
completeness. Rate from 1 (poor) to 5 (excellent).

Reply with JSON only, in this shape:
{{\"rating\": 1, \"feedback\": \"...\", \"strengths\": [\"...\"], \"weaknesses\": [\"...\"], \
\"suggestions\": [\"...\"], \"scoreBreakdown\": {{\"technicalAccuracy\": 1, \
\"communication\": 1, \"problemSolving\": 1, \"confidence\": 1, \"relevance\": 1}}}}
",
    question = req.question,
    response = req.user_response,
    role = req.job_role,
    years = req.experience_years,
  )
}

#[cfg(test)]
mod tests {
  use rehearse_core::interview::{InterviewCategory, InterviewDifficulty};

  use super::*;

  #[test]
  fn question_prompt_names_role_and_count() {
    let p = questions(&QuestionRequest {
      job_role:         "Data Engineer".into(),
      job_description:  "Pipelines".into(),
      experience_years: 2,
      category:         InterviewCategory::CaseStudy,
      difficulty:       InterviewDifficulty::Beginner,
      question_count:   7,
    });
    assert!(p.contains("Write 7 interview questions for a Data Engineer position"));
    assert!(p.contains("case-study interviews"));
    assert!(p.contains("Difficulty: beginner"));
    assert!(p.contains(r#"{"questions": [{"question": "...", "answer": "..."}]}"#));
  }

  #[test]
  fn evaluation_prompt_embeds_response() {
    let p = evaluation(&EvaluationRequest {
      question:         "Why Rust?".into(),
      user_response:    "Memory safety without GC.".into(),
      job_role:         "Systems Engineer".into(),
      experience_years: 6,
    });
    assert!(p.contains("Response: Memory safety without GC."));
    assert!(p.contains("Experience: 6 years"));
    assert!(p.contains(r#""scoreBreakdown": {"technicalAccuracy": 1"#));
  }
}
