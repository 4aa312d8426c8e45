//! AI assistant features with guaranteed heuristic fallback.
//!
//! Every entry point follows the same two-path policy: build a
//! feature-specific prompt from the current task set and ask Gemini for a
//! structured JSON answer; on any failure (missing key, transport error,
//! malformed response) compute an equivalent result from the local
//! heuristics. The fallback path is total, so callers never observe an error
//! from this module, only an `AiOutcome` tagged with the path that produced
//! it.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use db::models::task::{Task, TaskPriority};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::warn;
use ts_rs::TS;
use uuid::Uuid;

use super::classifier;
use super::config::Config;
use super::gemini::GeminiClient;
use super::scheduler;
use super::summary::{self, TaskSummary};

/// Result of an assistant feature, tagged with the path that produced it.
/// Both variants carry the same shape; callers that don't care about
/// provenance can use [`AiOutcome::into_value`].
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "source", content = "value", rename_all = "lowercase")]
pub enum AiOutcome<T> {
    Ai(T),
    Fallback(T),
}

impl<T> AiOutcome<T> {
    pub fn value(&self) -> &T {
        match self {
            AiOutcome::Ai(v) | AiOutcome::Fallback(v) => v,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            AiOutcome::Ai(v) | AiOutcome::Fallback(v) => v,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, AiOutcome::Fallback(_))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct TaskGroup {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tasks: Vec<i64>,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSuggestion {
    pub weather: String,
    pub suggestion: String,
    pub tasks: Vec<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Recurring,
    Scheduling,
    Optimization,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct SmartSuggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub title: String,
    pub description: String,
    pub action: String,
    pub tasks: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTask {
    #[serde(flatten)]
    #[ts(flatten)]
    pub task: Task,
    pub suggested_start_time: DateTime<Utc>,
    pub estimated_minutes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct DeadlineSuggestion {
    pub task_id: i64,
    pub suggested_deadline: NaiveDate,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct FocusRecommendation {
    pub recommended_task: Option<i64>,
    pub duration_minutes: u32,
    pub environment: String,
    pub distractions: Vec<String>,
    pub technique: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct DuplicatePair {
    pub task_id_1: i64,
    pub task_id_2: i64,
    pub similarity: f64,
    pub suggestion: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct ReschedulingSuggestion {
    pub task_id: i64,
    pub current_due_date: NaiveDate,
    pub suggested_due_date: NaiveDate,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
pub enum ConflictKind {
    Time,
    Priority,
    Resource,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct TaskConflict {
    pub task_id_1: i64,
    pub task_id_2: i64,
    pub conflict_type: ConflictKind,
    pub description: String,
    pub resolution: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
pub enum BreakKind {
    Short,
    Long,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct BreakTimer {
    pub id: Uuid,
    pub duration_minutes: u32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: BreakKind,
    pub activity: String,
    pub benefits: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
pub enum VoiceAction {
    Add,
    Delete,
    Edit,
    Complete,
    List,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct VoiceCommand {
    pub command: String,
    pub action: VoiceAction,
    #[ts(type = "Record<string, unknown>")]
    pub parameters: serde_json::Value,
    pub response: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPrediction {
    pub week: String,
    pub predicted_tasks: u32,
    /// Percentage, 0..=100.
    pub predicted_completion: f64,
    pub recommendations: Vec<String>,
    pub predicted_task_ids: Vec<i64>,
}

/// Wire shape for the AI path; predictedTaskIds is optional and derived
/// locally when the model omits it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WeeklyPredictionWire {
    week: String,
    predicted_tasks: u32,
    predicted_completion: f64,
    recommendations: Vec<String>,
    predicted_task_ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct ProductivitySummary {
    pub ai_insights: String,
    pub recommendations: Vec<String>,
}

/// Assistant facade over the Gemini client plus the local heuristics.
pub struct Assistant {
    gemini: Option<GeminiClient>,
}

impl Assistant {
    pub fn new(gemini: Option<GeminiClient>) -> Self {
        Self { gemini }
    }

    pub fn from_config(config: &Config) -> Self {
        let gemini = match config.gemini_api_key.clone() {
            Some(key) => match GeminiClient::new(key, config.gemini_model.clone()) {
                Ok(client) => Some(client),
                Err(e) => {
                    warn!(error = %e, "could not build Gemini client, assistant runs on heuristics only");
                    None
                }
            },
            None => {
                warn!("GEMINI_API_KEY not set - assistant runs on heuristics only");
                None
            }
        };
        Self { gemini }
    }

    /// Heuristics-only assistant; every feature takes the fallback path.
    pub fn heuristic_only() -> Self {
        Self { gemini: None }
    }

    /// Ask the model for a `T`; None on any failure (which callers answer
    /// with the heuristic fallback).
    async fn ask<T: DeserializeOwned>(&self, feature: &str, prompt: String) -> Option<T> {
        let client = self.gemini.as_ref()?;
        match client.ask_json::<T>(&prompt).await {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(feature, error = %e, "AI call failed, using heuristic fallback");
                None
            }
        }
    }

    pub async fn group_tasks(&self, tasks: &[Task]) -> AiOutcome<Vec<TaskGroup>> {
        let prompt = format!(
            "Analyze these tasks and group them logically. Return a JSON array of groups, \
             each with: id, name, description, tasks (array of task ids), color (hex).\n\n\
             Tasks: {}\n\nGroup by project, category, priority, or similar themes.",
            tasks_json(tasks)
        );
        if let Some(groups) = self.ask("task_grouping", prompt).await {
            return AiOutcome::Ai(groups);
        }
        AiOutcome::Fallback(fallback_group_tasks(tasks))
    }

    pub async fn weather_suggestions(&self, tasks: &[Task]) -> AiOutcome<Vec<WeatherSuggestion>> {
        let buckets = classifier::categorize(tasks);
        let prompt = format!(
            "Based on weather conditions, suggest task modifications. Return a JSON array; \
             each entry has: weather, suggestion, tasks (array of task ids).\n\n\
             Tasks: {}\n\
             Indoor task ids: {:?}\nOutdoor task ids: {:?}\nFlexible task ids: {:?}\n\n\
             Consider weather impact on productivity and safety.",
            tasks_json(tasks),
            ids(&buckets.indoor),
            ids(&buckets.outdoor),
            ids(&buckets.flexible),
        );
        if let Some(suggestions) = self.ask("weather_suggestions", prompt).await {
            return AiOutcome::Ai(suggestions);
        }
        AiOutcome::Fallback(fallback_weather_suggestions(tasks))
    }

    pub async fn smart_suggestions(&self, tasks: &[Task]) -> AiOutcome<Vec<SmartSuggestion>> {
        let prompt = format!(
            "Analyze tasks and provide smart suggestions. Return a JSON array; each entry \
             has: type (recurring|scheduling|optimization), title, description, action, \
             tasks (array of task ids).\n\nTasks: {}\n\n\
             Look for patterns, recurring tasks, scheduling conflicts, optimization \
             opportunities.",
            tasks_json(tasks)
        );
        if let Some(suggestions) = self.ask("smart_suggestions", prompt).await {
            return AiOutcome::Ai(suggestions);
        }
        AiOutcome::Fallback(fallback_smart_suggestions(tasks))
    }

    pub async fn optimal_schedule(&self, tasks: &[Task]) -> AiOutcome<Vec<ScheduledTask>> {
        let prompt = format!(
            "Create an optimal schedule for these tasks. Return a JSON array where each \
             entry is a task object extended with suggestedStartTime (RFC 3339) and \
             estimatedMinutes. Consider priority, due dates, and energy levels.\n\n\
             Tasks: {}",
            tasks_json(tasks)
        );
        if let Some(schedule) = self.ask("optimal_schedule", prompt).await {
            return AiOutcome::Ai(schedule);
        }
        AiOutcome::Fallback(fallback_optimal_schedule(tasks, Utc::now()))
    }

    pub async fn deadline_suggestions(&self, tasks: &[Task]) -> AiOutcome<Vec<DeadlineSuggestion>> {
        let prompt = format!(
            "Suggest realistic deadlines for these tasks. Return a JSON array; each entry \
             has: taskId, suggestedDeadline (YYYY-MM-DD), reason.\n\nTasks: {}",
            tasks_json(tasks)
        );
        if let Some(suggestions) = self.ask("deadline_suggestions", prompt).await {
            return AiOutcome::Ai(suggestions);
        }
        AiOutcome::Fallback(fallback_deadline_suggestions(tasks))
    }

    pub async fn focus_recommendation(&self, tasks: &[Task]) -> AiOutcome<FocusRecommendation> {
        let prompt = format!(
            "Recommend focus mode settings. Return a JSON object with: recommendedTask \
             (task id), durationMinutes, environment, distractions (array), technique.\n\n\
             Tasks: {}",
            tasks_json(tasks)
        );
        if let Some(recommendation) = self.ask("focus_recommendation", prompt).await {
            return AiOutcome::Ai(recommendation);
        }
        AiOutcome::Fallback(fallback_focus_recommendation(tasks))
    }

    pub async fn detect_duplicates(&self, tasks: &[Task]) -> AiOutcome<Vec<DuplicatePair>> {
        let prompt = format!(
            "Detect duplicate or similar tasks. Return a JSON array; each entry has: \
             taskId1, taskId2, similarity (0..1), suggestion.\n\nTasks: {}",
            tasks_json(tasks)
        );
        if let Some(duplicates) = self.ask("duplicate_detection", prompt).await {
            return AiOutcome::Ai(duplicates);
        }
        AiOutcome::Fallback(fallback_detect_duplicates(tasks))
    }

    pub async fn rescheduling_suggestions(
        &self,
        tasks: &[Task],
    ) -> AiOutcome<Vec<ReschedulingSuggestion>> {
        let prompt = format!(
            "Suggest task rescheduling. Return a JSON array; each entry has: taskId, \
             currentDueDate, suggestedDueDate, reason. Consider conflicts, priority \
             changes, and time availability.\n\nTasks: {}",
            tasks_json(tasks)
        );
        if let Some(suggestions) = self.ask("rescheduling", prompt).await {
            return AiOutcome::Ai(suggestions);
        }
        AiOutcome::Fallback(fallback_rescheduling(tasks, Utc::now().date_naive()))
    }

    pub async fn resolve_conflicts(&self, tasks: &[Task]) -> AiOutcome<Vec<TaskConflict>> {
        let prompt = format!(
            "Identify and resolve task conflicts. Return a JSON array; each entry has: \
             taskId1, taskId2, conflictType (time|priority|resource), description, \
             resolution.\n\nTasks: {}",
            tasks_json(tasks)
        );
        if let Some(conflicts) = self.ask("conflict_resolution", prompt).await {
            return AiOutcome::Ai(conflicts);
        }
        AiOutcome::Fallback(fallback_resolve_conflicts(tasks))
    }

    /// Break timers are always computed locally: a fixed short break after a
    /// two-hour work session.
    pub fn break_timer(&self) -> BreakTimer {
        let now = Utc::now();
        let duration_minutes = 15;
        BreakTimer {
            id: Uuid::new_v4(),
            duration_minutes,
            start_time: now,
            end_time: now + Duration::minutes(i64::from(duration_minutes)),
            kind: BreakKind::Short,
            activity: "Mindfulness and stretching".to_string(),
            benefits: vec![
                "Improves focus".to_string(),
                "Reduces stress".to_string(),
                "Increases energy".to_string(),
            ],
        }
    }

    pub async fn voice_command(&self, command: &str, tasks: &[Task]) -> AiOutcome<VoiceCommand> {
        let prompt = format!(
            "Process this voice command and return a JSON object with: command (the \
             original text), action (add|delete|edit|complete|list), parameters (object), \
             response (string).\n\nCommand: \"{command}\"\nAvailable tasks: {}",
            tasks_json(tasks)
        );
        if let Some(parsed) = self.ask("voice_command", prompt).await {
            return AiOutcome::Ai(parsed);
        }
        AiOutcome::Fallback(fallback_voice_command(command))
    }

    pub async fn weekly_prediction(&self, tasks: &[Task]) -> AiOutcome<WeeklyPrediction> {
        let prompt = format!(
            "Predict next week's workload. Return a JSON object with: week (date range), \
             predictedTasks (count), predictedCompletion (percentage), recommendations \
             (array of strings), predictedTaskIds (ids from the provided tasks likely to \
             be worked on).\n\nHistorical tasks: {}",
            tasks_json(tasks)
        );
        if let Some(wire) = self.ask::<WeeklyPredictionWire>("weekly_prediction", prompt).await {
            let predicted_task_ids = wire
                .predicted_task_ids
                .unwrap_or_else(|| scheduler::predicted_task_ids(tasks));
            return AiOutcome::Ai(WeeklyPrediction {
                week: wire.week,
                predicted_tasks: wire.predicted_tasks,
                predicted_completion: wire.predicted_completion.clamp(0.0, 100.0),
                recommendations: wire.recommendations,
                predicted_task_ids,
            });
        }
        AiOutcome::Fallback(fallback_weekly_prediction(tasks, Utc::now().date_naive()))
    }

    pub async fn productivity_summary(
        &self,
        tasks: &[Task],
        window_days: u32,
        today: NaiveDate,
    ) -> AiOutcome<ProductivitySummary> {
        let stats = summary::summarize(tasks, window_days, today);
        let prompt = format!(
            "You are a productivity coach. Given these statistics over a {window_days}-day \
             window: {} and the task list: {}, return a JSON object with: aiInsights (a \
             short productivity analysis paragraph) and recommendations (array of 3 \
             actionable strings).",
            serde_json::to_string(&stats).unwrap_or_else(|_| "{}".to_string()),
            tasks_json(tasks)
        );
        if let Some(summary) = self.ask("productivity_summary", prompt).await {
            return AiOutcome::Ai(summary);
        }
        AiOutcome::Fallback(fallback_productivity_summary(&stats))
    }
}

fn tasks_json(tasks: &[Task]) -> String {
    serde_json::to_string(tasks).unwrap_or_else(|_| "[]".to_string())
}

fn ids(tasks: &[&Task]) -> Vec<i64> {
    tasks.iter().map(|t| t.id).collect()
}

fn fallback_group_tasks(tasks: &[Task]) -> Vec<TaskGroup> {
    let bucket = |priority: TaskPriority| -> Vec<i64> {
        tasks
            .iter()
            .filter(|t| t.priority == priority)
            .map(|t| t.id)
            .collect()
    };

    let groups = vec![
        TaskGroup {
            id: "urgent".to_string(),
            name: "Urgent Tasks".to_string(),
            description: "High priority tasks requiring immediate attention".to_string(),
            tasks: bucket(TaskPriority::Urgent),
            color: "#ef4444".to_string(),
        },
        TaskGroup {
            id: "high".to_string(),
            name: "High Priority".to_string(),
            description: "Important tasks with high priority".to_string(),
            tasks: bucket(TaskPriority::High),
            color: "#f97316".to_string(),
        },
        TaskGroup {
            id: "medium".to_string(),
            name: "Medium Priority".to_string(),
            description: "Standard priority tasks".to_string(),
            tasks: bucket(TaskPriority::Medium),
            color: "#eab308".to_string(),
        },
        TaskGroup {
            id: "low".to_string(),
            name: "Low Priority".to_string(),
            description: "Low priority tasks".to_string(),
            tasks: bucket(TaskPriority::Low),
            color: "#22c55e".to_string(),
        },
    ];

    groups.into_iter().filter(|g| !g.tasks.is_empty()).collect()
}

fn fallback_weather_suggestions(tasks: &[Task]) -> Vec<WeatherSuggestion> {
    let buckets = classifier::categorize(tasks);
    vec![
        WeatherSuggestion {
            weather: "sunny".to_string(),
            suggestion: format!(
                "Great weather for outdoor activities! Perfect time for {} outdoor tasks.",
                buckets.outdoor.len()
            ),
            tasks: ids(&buckets.outdoor),
        },
        WeatherSuggestion {
            weather: "rainy".to_string(),
            suggestion: format!(
                "Perfect for focused indoor work. Prioritize {} indoor tasks.",
                buckets.indoor.len()
            ),
            tasks: ids(&buckets.indoor),
        },
        WeatherSuggestion {
            weather: "flexible".to_string(),
            suggestion: format!(
                "Weather is suitable for both indoor and outdoor activities. You have {} flexible tasks.",
                buckets.flexible.len()
            ),
            tasks: ids(&buckets.flexible),
        },
    ]
}

fn fallback_smart_suggestions(tasks: &[Task]) -> Vec<SmartSuggestion> {
    let mut suggestions = Vec::new();

    // Repeated names hint at a recurring chore.
    let lowered: Vec<String> = tasks.iter().map(|t| t.name.to_lowercase()).collect();
    let duplicated: Vec<i64> = tasks
        .iter()
        .enumerate()
        .filter(|(i, t)| {
            let name = t.name.to_lowercase();
            lowered
                .iter()
                .enumerate()
                .any(|(j, other)| j != *i && *other == name)
        })
        .map(|(_, t)| t.id)
        .collect();

    if !duplicated.is_empty() {
        suggestions.push(SmartSuggestion {
            kind: SuggestionKind::Recurring,
            title: "Recurring Tasks Detected".to_string(),
            description: "Consider setting up recurring task templates".to_string(),
            action: "Create recurring task".to_string(),
            tasks: duplicated,
        });
    }

    let urgent_pending: Vec<i64> = tasks
        .iter()
        .filter(|t| t.priority == TaskPriority::Urgent && !t.status)
        .map(|t| t.id)
        .collect();
    if urgent_pending.len() > 3 {
        suggestions.push(SmartSuggestion {
            kind: SuggestionKind::Scheduling,
            title: "Too Many Urgent Tasks".to_string(),
            description: "Consider delegating or rescheduling some urgent tasks".to_string(),
            action: "Review priorities".to_string(),
            tasks: urgent_pending,
        });
    }

    suggestions
}

fn fallback_optimal_schedule(tasks: &[Task], now: DateTime<Utc>) -> Vec<ScheduledTask> {
    scheduler::sort_pending(tasks)
        .into_iter()
        .enumerate()
        .map(|(index, task)| ScheduledTask {
            task,
            suggested_start_time: now + Duration::hours(index as i64),
            estimated_minutes: 60,
        })
        .collect()
}

fn fallback_deadline_suggestions(tasks: &[Task]) -> Vec<DeadlineSuggestion> {
    tasks
        .iter()
        .map(|task| DeadlineSuggestion {
            task_id: task.id,
            suggested_deadline: task.due_date,
            reason: format!("Based on priority: {}", task.priority),
        })
        .collect()
}

fn fallback_focus_recommendation(tasks: &[Task]) -> FocusRecommendation {
    FocusRecommendation {
        recommended_task: scheduler::focus_candidate(tasks).map(|t| t.id),
        duration_minutes: 25,
        environment: "Quiet space with minimal distractions".to_string(),
        distractions: vec![
            "Phone notifications".to_string(),
            "Social media".to_string(),
            "Email".to_string(),
        ],
        technique: Some("Pomodoro technique recommended".to_string()),
    }
}

fn fallback_detect_duplicates(tasks: &[Task]) -> Vec<DuplicatePair> {
    let mut duplicates = Vec::new();
    for i in 0..tasks.len() {
        for j in (i + 1)..tasks.len() {
            if tasks[i].name.to_lowercase() == tasks[j].name.to_lowercase() {
                duplicates.push(DuplicatePair {
                    task_id_1: tasks[i].id,
                    task_id_2: tasks[j].id,
                    similarity: 1.0,
                    suggestion: "Consider merging these tasks".to_string(),
                });
            }
        }
    }
    duplicates
}

fn fallback_rescheduling(tasks: &[Task], today: NaiveDate) -> Vec<ReschedulingSuggestion> {
    let tomorrow = today + Duration::days(1);
    tasks
        .iter()
        .filter(|t| !t.status && t.due_date < today)
        .map(|task| ReschedulingSuggestion {
            task_id: task.id,
            current_due_date: task.due_date,
            suggested_due_date: tomorrow,
            reason: "Task is overdue".to_string(),
        })
        .collect()
}

fn fallback_resolve_conflicts(tasks: &[Task]) -> Vec<TaskConflict> {
    let urgent_pending: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.priority == TaskPriority::Urgent && !t.status)
        .collect();

    if urgent_pending.len() > 2 {
        vec![TaskConflict {
            task_id_1: urgent_pending[0].id,
            task_id_2: urgent_pending[1].id,
            conflict_type: ConflictKind::Priority,
            description: "Multiple urgent tasks may overwhelm".to_string(),
            resolution: "Consider delegating one urgent task".to_string(),
        }]
    } else {
        Vec::new()
    }
}

fn fallback_voice_command(command: &str) -> VoiceCommand {
    let lowered = command.to_lowercase();

    if lowered.contains("add") || lowered.contains("create") {
        let name = strip_keywords(command, &["add", "create"]);
        return VoiceCommand {
            command: command.to_string(),
            action: VoiceAction::Add,
            parameters: serde_json::json!({ "title": name }),
            response: Some(format!("Adding task: {name}")),
        };
    }

    if lowered.contains("complete") || lowered.contains("done") {
        let name = strip_keywords(command, &["complete", "done"]);
        return VoiceCommand {
            command: command.to_string(),
            action: VoiceAction::Complete,
            parameters: serde_json::json!({ "taskName": name }),
            response: Some(format!("Marking task as complete: {name}")),
        };
    }

    VoiceCommand {
        command: command.to_string(),
        action: VoiceAction::Unknown,
        parameters: serde_json::json!({}),
        response: Some(
            "I didn't understand that command. Try saying \"add task\" or \"complete task\"."
                .to_string(),
        ),
    }
}

fn strip_keywords(command: &str, keywords: &[&str]) -> String {
    command
        .split_whitespace()
        .filter(|word| !keywords.iter().any(|k| word.eq_ignore_ascii_case(k)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn fallback_weekly_prediction(tasks: &[Task], today: NaiveDate) -> WeeklyPrediction {
    let next_week = today + Duration::days(7);
    let week = format!("{today} - {next_week}");
    let recommendations = vec![
        "Focus on high-priority tasks first".to_string(),
        "Schedule breaks between work sessions".to_string(),
        "Review and update task priorities regularly".to_string(),
    ];

    if tasks.is_empty() {
        return WeeklyPrediction {
            week,
            predicted_tasks: 0,
            predicted_completion: 0.0,
            recommendations,
            predicted_task_ids: Vec::new(),
        };
    }

    let total = tasks.len();
    let completed = tasks.iter().filter(|t| t.status).count();
    let completion_pct = completed as f64 / total as f64 * 100.0;

    WeeklyPrediction {
        week,
        // 10% growth, 5-point improvement: naive trend extrapolation.
        predicted_tasks: (total as f64 * 1.1).ceil() as u32,
        predicted_completion: (completion_pct + 5.0).min(100.0),
        recommendations,
        predicted_task_ids: scheduler::predicted_task_ids(tasks),
    }
}

fn fallback_productivity_summary(stats: &TaskSummary) -> ProductivitySummary {
    let window = stats.window_days;
    let ai_insights = if stats.total == 0 {
        format!("No tasks fall within the {window}-day window. Add due dates to your tasks to see productivity trends here.")
    } else {
        format!(
            "Within the {window}-day window you completed {} of {} tasks ({:.0}% completion). {} tasks are still pending, {} of them urgent.",
            stats.completed,
            stats.total,
            stats.completion_rate * 100.0,
            stats.pending,
            stats.pending_by_priority.urgent
        )
    };

    let mut recommendations = Vec::new();
    if stats.pending_by_priority.urgent > 0 {
        recommendations.push(format!(
            "Tackle the {} urgent pending task(s) first",
            stats.pending_by_priority.urgent
        ));
    }
    if stats.total > 0 && stats.completion_rate < 0.5 {
        recommendations
            .push("Break large tasks into smaller steps to lift your completion rate".to_string());
    }
    recommendations.push("Review and update task priorities regularly".to_string());

    ProductivitySummary {
        ai_insights,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: i64, name: &str, priority: TaskPriority, status: bool, due: NaiveDate) -> Task {
        Task {
            id,
            name: name.to_string(),
            description: String::new(),
            due_date: due,
            status,
            priority,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, d).unwrap()
    }

    fn sample_tasks() -> Vec<Task> {
        vec![
            task(1, "Walk the dog", TaskPriority::Urgent, false, day(24)),
            task(2, "Pay bills", TaskPriority::Low, false, day(23)),
            task(3, "Write report", TaskPriority::High, false, day(26)),
            task(4, "Pay bills", TaskPriority::Medium, true, day(25)),
        ]
    }

    #[tokio::test]
    async fn every_feature_survives_without_ai() {
        let assistant = Assistant::heuristic_only();
        let tasks = sample_tasks();

        assert!(assistant.group_tasks(&tasks).await.is_fallback());
        assert!(assistant.weather_suggestions(&tasks).await.is_fallback());
        assert!(assistant.smart_suggestions(&tasks).await.is_fallback());
        assert!(assistant.optimal_schedule(&tasks).await.is_fallback());
        assert!(assistant.deadline_suggestions(&tasks).await.is_fallback());
        assert!(assistant.focus_recommendation(&tasks).await.is_fallback());
        assert!(assistant.detect_duplicates(&tasks).await.is_fallback());
        assert!(assistant.rescheduling_suggestions(&tasks).await.is_fallback());
        assert!(assistant.resolve_conflicts(&tasks).await.is_fallback());
        assert!(assistant.voice_command("list tasks", &tasks).await.is_fallback());
        assert!(assistant.weekly_prediction(&tasks).await.is_fallback());
        assert!(
            assistant
                .productivity_summary(&tasks, 7, day(24))
                .await
                .is_fallback()
        );
    }

    #[tokio::test]
    async fn grouping_drops_empty_buckets() {
        let assistant = Assistant::heuristic_only();
        let tasks = vec![
            task(1, "a", TaskPriority::Urgent, false, day(24)),
            task(2, "b", TaskPriority::Urgent, false, day(24)),
        ];
        let groups = assistant.group_tasks(&tasks).await.into_value();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, "urgent");
        assert_eq!(groups[0].tasks, vec![1, 2]);
        assert_eq!(groups[0].color, "#ef4444");
    }

    #[tokio::test]
    async fn schedule_orders_pending_with_hourly_slots() {
        let assistant = Assistant::heuristic_only();
        let tasks = sample_tasks();
        let schedule = assistant.optimal_schedule(&tasks).await.into_value();

        // Completed task 4 is excluded; urgent first.
        let ids: Vec<i64> = schedule.iter().map(|s| s.task.id).collect();
        assert_eq!(ids, vec![1, 3, 2]);
        for entry in &schedule {
            assert_eq!(entry.estimated_minutes, 60);
        }
        let gap = schedule[1].suggested_start_time - schedule[0].suggested_start_time;
        assert_eq!(gap, Duration::hours(1));
    }

    #[tokio::test]
    async fn duplicates_found_case_insensitively() {
        let assistant = Assistant::heuristic_only();
        let tasks = vec![
            task(1, "Pay Bills", TaskPriority::Low, false, day(24)),
            task(2, "pay bills", TaskPriority::Low, false, day(24)),
            task(3, "other", TaskPriority::Low, false, day(24)),
        ];
        let pairs = assistant.detect_duplicates(&tasks).await.into_value();
        assert_eq!(pairs.len(), 1);
        assert_eq!((pairs[0].task_id_1, pairs[0].task_id_2), (1, 2));
        assert_eq!(pairs[0].similarity, 1.0);
    }

    #[tokio::test]
    async fn conflicts_require_more_than_two_urgent() {
        let assistant = Assistant::heuristic_only();
        let two = vec![
            task(1, "a", TaskPriority::Urgent, false, day(24)),
            task(2, "b", TaskPriority::Urgent, false, day(24)),
        ];
        assert!(assistant.resolve_conflicts(&two).await.into_value().is_empty());

        let mut three = two.clone();
        three.push(task(3, "c", TaskPriority::Urgent, false, day(24)));
        let conflicts = assistant.resolve_conflicts(&three).await.into_value();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].conflict_type, ConflictKind::Priority);
    }

    #[test]
    fn rescheduling_targets_only_overdue_pending() {
        let tasks = sample_tasks();
        let suggestions = fallback_rescheduling(&tasks, day(24));
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].task_id, 2);
        assert_eq!(suggestions[0].current_due_date, day(23));
        assert_eq!(suggestions[0].suggested_due_date, day(25));
        assert_eq!(suggestions[0].reason, "Task is overdue");
    }

    #[tokio::test]
    async fn voice_command_add_complete_unknown() {
        let assistant = Assistant::heuristic_only();

        let add = assistant.voice_command("add buy milk", &[]).await.into_value();
        assert_eq!(add.action, VoiceAction::Add);
        assert_eq!(add.parameters["title"], "buy milk");

        let complete = assistant
            .voice_command("complete buy milk", &[])
            .await
            .into_value();
        assert_eq!(complete.action, VoiceAction::Complete);
        assert_eq!(complete.parameters["taskName"], "buy milk");

        let unknown = assistant.voice_command("sing a song", &[]).await.into_value();
        assert_eq!(unknown.action, VoiceAction::Unknown);
        assert!(unknown.response.is_some());
    }

    #[tokio::test]
    async fn weekly_prediction_on_empty_list_is_all_zero() {
        let assistant = Assistant::heuristic_only();
        let prediction = assistant.weekly_prediction(&[]).await.into_value();
        assert_eq!(prediction.predicted_tasks, 0);
        assert_eq!(prediction.predicted_completion, 0.0);
        assert!(prediction.predicted_task_ids.is_empty());
    }

    #[tokio::test]
    async fn weekly_prediction_extrapolates_trend() {
        let assistant = Assistant::heuristic_only();
        let tasks = sample_tasks();
        let prediction = assistant.weekly_prediction(&tasks).await.into_value();
        // 4 tasks * 1.1 = 4.4 -> 5; 25% completed + 5 points.
        assert_eq!(prediction.predicted_tasks, 5);
        assert!((prediction.predicted_completion - 30.0).abs() < 1e-9);
        assert_eq!(prediction.predicted_task_ids, vec![1, 3, 2]);
    }

    #[tokio::test]
    async fn focus_recommendation_picks_top_of_queue() {
        let assistant = Assistant::heuristic_only();
        let tasks = sample_tasks();
        let focus = assistant.focus_recommendation(&tasks).await.into_value();
        assert_eq!(focus.recommended_task, Some(1));
        assert_eq!(focus.duration_minutes, 25);

        let empty = assistant.focus_recommendation(&[]).await.into_value();
        assert_eq!(empty.recommended_task, None);
    }

    #[tokio::test]
    async fn smart_suggestions_flag_duplicates_and_urgent_overload() {
        let assistant = Assistant::heuristic_only();
        let tasks = sample_tasks();
        let suggestions = assistant.smart_suggestions(&tasks).await.into_value();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].kind, SuggestionKind::Recurring);
        assert_eq!(suggestions[0].tasks, vec![2, 4]);

        let urgent: Vec<Task> = (1..=4)
            .map(|id| task(id, &format!("u{id}"), TaskPriority::Urgent, false, day(24)))
            .collect();
        let suggestions = assistant.smart_suggestions(&urgent).await.into_value();
        assert!(
            suggestions
                .iter()
                .any(|s| s.kind == SuggestionKind::Scheduling)
        );
    }

    #[test]
    fn break_timer_is_a_fixed_short_break() {
        let assistant = Assistant::heuristic_only();
        let timer = assistant.break_timer();
        assert_eq!(timer.duration_minutes, 15);
        assert_eq!(timer.kind, BreakKind::Short);
        assert_eq!(timer.end_time - timer.start_time, Duration::minutes(15));
        assert_eq!(timer.benefits.len(), 3);
    }

    #[tokio::test]
    async fn productivity_summary_interpolates_counts() {
        let assistant = Assistant::heuristic_only();
        let tasks = sample_tasks();
        let summary = assistant
            .productivity_summary(&tasks, 7, day(24))
            .await
            .into_value();
        assert!(summary.ai_insights.contains("7-day window"));
        assert!(summary.ai_insights.contains("1 of 4"));
        assert!(!summary.recommendations.is_empty());
        assert!(summary.recommendations[0].contains("urgent"));
    }

    #[test]
    fn outcome_serializes_with_source_tag() {
        let outcome = AiOutcome::Fallback(vec![1, 2]);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["source"], "fallback");
        assert_eq!(json["value"], serde_json::json!([1, 2]));
    }
}
