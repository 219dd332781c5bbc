// LLM prompt constants for the career advisor.

use super::roadmap::RoadmapQuery;

pub const CAREER_ADVISOR_SYSTEM: &str = "You are an AI Career Advisor. Your role is to help users with:
- Career predictions and recommendations
- Skill gap analysis and learning paths
- Resume and job matching advice
- Career transition guidance
- Answering questions about career development, skills, and job market trends

Be helpful, professional, and concise. If the user asks about specific features, guide them to use \
the Profile, Skill Gap, or Resume Match features of this application.";

pub const ROADMAP_SYSTEM: &str =
    "You are a career advisor expert. Generate detailed, actionable career roadmaps in JSON format.";

const ROADMAP_INSTRUCTIONS: &str = r#"
Please provide a structured roadmap with:
1. Title/Name for the roadmap
2. 5-7 clear steps with:
   - Step name/title
   - Duration (e.g., "Week 1", "Weeks 2-8", "Month 3-6")
   - Description of what to do
   - 3-5 specific actionable tasks
   - Required skills or knowledge for that step
3. Overall timeline estimate
4. Key milestones

Format the response as a JSON object with this structure:
{
  "title": "Roadmap title",
  "description": "Brief description",
  "timeline": "Overall timeline estimate",
  "steps": [
    {
      "title": "Step name",
      "duration": "Duration",
      "description": "What to do",
      "tasks": ["task 1", "task 2", "task 3"],
      "skills": ["skill 1", "skill 2"],
      "icon": "suggested_icon_name"
    }
  ]
}

Return ONLY the JSON, no additional text or markdown formatting."#;

/// User prompt for roadmap generation. Optional fields are omitted when absent.
pub fn roadmap_prompt(query: &RoadmapQuery) -> String {
    let mut prompt = format!(
        "Generate a detailed, actionable career roadmap for the following scenario:\n\nUser Query: {}\n",
        query.query
    );
    if let Some(role) = query.current_role.as_deref().filter(|r| !r.trim().is_empty()) {
        prompt.push_str(&format!("Current Role: {role}\n"));
    }
    if let Some(role) = query.target_role.as_deref().filter(|r| !r.trim().is_empty()) {
        prompt.push_str(&format!("Target Role: {role}\n"));
    }
    if !query.current_skills.is_empty() {
        prompt.push_str(&format!(
            "Current Skills: {}\n",
            query.current_skills.join(", ")
        ));
    }
    prompt.push_str(ROADMAP_INSTRUCTIONS);
    prompt
}
