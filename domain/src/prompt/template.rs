//! Prompt templates for feedback and topic generation

use crate::feedback::entities::FeedbackRequest;
use crate::providers::ProviderKind;

/// Sampling settings sent along with a prompt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl GenerationParams {
    /// Low temperature keeps the structured JSON output consistent.
    pub const FEEDBACK: GenerationParams = GenerationParams {
        temperature: 0.3,
        max_tokens: 4000,
    };

    pub const TOPIC: GenerationParams = GenerationParams {
        temperature: 0.7,
        max_tokens: 200,
    };
}

/// Templates for every prompt sent to a provider
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt, phrased per provider.
    pub fn system(provider: ProviderKind) -> &'static str {
        match provider {
            ProviderKind::Anthropic => {
                "You are a professional communication coach. Provide helpful, specific, and actionable feedback to improve communication skills."
            }
            ProviderKind::Gemini => {
                "You are an expert communication coach specializing in professional development. Your feedback should be constructive, detailed, and practical."
            }
        }
    }

    /// User prompt asking for JSON feedback on a practice submission
    pub fn feedback(request: &FeedbackRequest) -> String {
        format!(
            r#"You are a professional communication coach specializing in helping people improve their communication skills for various contexts (presentations, meetings, interviews, etc.).

Analyze the following communication practice session and provide detailed, actionable feedback:

**Topic:** {topic}
**Goal:** {goal}
**Main Points:** {points}
**Pitch/Content:** {pitch}

Please provide feedback in the following JSON format (respond with valid JSON only, no markdown formatting):

{{
  "score": [number between 1-10],
  "strengths": ["specific strength 1", "specific strength 2", "specific strength 3"],
  "improvements": ["specific improvement suggestion 1", "specific improvement suggestion 2", "specific improvement suggestion 3"],
  "improvedVersions": {{
    "topic": "improved topic if needed, or original if already good",
    "mainPoints": ["improved main point 1", "improved main point 2", "improved main point 3"],
    "pitch": "improved version of the pitch with better structure, clarity, and impact"
  }}
}}

Evaluation criteria:
- Clarity and structure
- Relevance to the stated goal
- Engagement and persuasiveness
- Professional tone and language
- Logical flow of ideas
- Completeness of key points

Focus on providing constructive, specific feedback that will help the person improve their communication effectiveness."#,
            topic = request.topic,
            goal = request.goal,
            points = request.main_points.join(", "),
            pitch = request.pitch,
        )
    }

    /// User prompt asking for one practice scenario for a role
    pub fn topic(role: &str) -> String {
        format!(
            r#"Generate a realistic and relevant communication practice scenario for someone in the "{role}" role.

The topic should be:
- Realistic and commonly encountered in this role
- Challenging enough to provide good practice
- Specific and actionable
- Professional and appropriate

Examples of good topics for different roles:
- Software Engineer: "Explaining a technical architecture decision to non-technical stakeholders"
- Marketing Manager: "Presenting quarterly campaign results and proposing budget adjustments"
- Sales Representative: "Pitching a complex enterprise solution to a skeptical client"
- Product Manager: "Convincing engineering team to prioritize a user-requested feature"
- Teacher: "Explaining a difficult concept to students who are struggling"

Respond with just the topic text, no additional formatting or explanation. The topic should be one clear sentence that describes the communication scenario."#
        )
    }
}
