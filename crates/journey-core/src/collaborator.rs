//! Dialog collaborators and the structured answers they hand back.
//!
//! A collaborator gathers input for one checklist item and reports
//! completion with a typed payload. The core never looks inside the dialog;
//! it only resolves which item a collaborator is bound to and stores the
//! payload once it arrives.

use crate::error::{JourneyError, Result};
use crate::types::DayNumber;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// CollaboratorKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollaboratorKind {
    FocusHour,
    ProblemDefinition,
    TargetAudience,
    ResearchSources,
    SolutionExamples,
    Insights,
    SolutionSteps,
    Resources,
    Mvp,
    ToolSelection,
    Wireframe,
    ProjectSummary,
    TitleGenerator,
    ContentEditor,
    CallToAction,
    Feedback,
    Suggestions,
    ReviewChecklist,
    PublishLink,
}

impl CollaboratorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CollaboratorKind::FocusHour => "focus_hour",
            CollaboratorKind::ProblemDefinition => "problem_definition",
            CollaboratorKind::TargetAudience => "target_audience",
            CollaboratorKind::ResearchSources => "research_sources",
            CollaboratorKind::SolutionExamples => "solution_examples",
            CollaboratorKind::Insights => "insights",
            CollaboratorKind::SolutionSteps => "solution_steps",
            CollaboratorKind::Resources => "resources",
            CollaboratorKind::Mvp => "mvp",
            CollaboratorKind::ToolSelection => "tool_selection",
            CollaboratorKind::Wireframe => "wireframe",
            CollaboratorKind::ProjectSummary => "project_summary",
            CollaboratorKind::TitleGenerator => "title_generator",
            CollaboratorKind::ContentEditor => "content_editor",
            CollaboratorKind::CallToAction => "call_to_action",
            CollaboratorKind::Feedback => "feedback",
            CollaboratorKind::Suggestions => "suggestions",
            CollaboratorKind::ReviewChecklist => "review_checklist",
            CollaboratorKind::PublishLink => "publish_link",
        }
    }
}

impl fmt::Display for CollaboratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Item bindings: (day, index) -> what happens when the item is ticked
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "kind", rename_all = "snake_case")]
pub enum ItemBinding {
    /// Plain reminder checkbox, flips immediately.
    Direct,
    /// Routed through the generic dialog collaborator.
    Dialog(CollaboratorKind),
    /// Dedicated publish flow; publishing itself is optional.
    Publish,
}

impl ItemBinding {
    pub fn collaborator(self) -> Option<CollaboratorKind> {
        match self {
            ItemBinding::Direct => None,
            ItemBinding::Dialog(kind) => Some(kind),
            ItemBinding::Publish => Some(CollaboratorKind::PublishLink),
        }
    }
}

use CollaboratorKind as K;
use ItemBinding::{Dialog, Direct, Publish};

static BINDINGS: [&[ItemBinding]; 7] = [
    &[Dialog(K::FocusHour), Dialog(K::ProblemDefinition), Dialog(K::TargetAudience)],
    &[Dialog(K::ResearchSources), Dialog(K::SolutionExamples), Dialog(K::Insights)],
    &[Dialog(K::SolutionSteps), Dialog(K::Resources), Dialog(K::Mvp)],
    &[Dialog(K::ToolSelection), Dialog(K::Wireframe), Dialog(K::ProjectSummary)],
    &[Dialog(K::TitleGenerator), Dialog(K::ContentEditor), Dialog(K::CallToAction)],
    &[Direct, Dialog(K::Feedback), Dialog(K::Suggestions)],
    &[Dialog(K::ReviewChecklist), Publish],
];

pub fn bindings(day: DayNumber) -> &'static [ItemBinding] {
    BINDINGS[day.index()]
}

pub fn binding(day: DayNumber, index: usize) -> Option<ItemBinding> {
    bindings(day).get(index).copied()
}

/// Checklist index a collaborator completes on `day`, if it belongs there.
pub fn item_for(day: DayNumber, kind: CollaboratorKind) -> Option<usize> {
    bindings(day)
        .iter()
        .position(|b| b.collaborator() == Some(kind))
}

// ---------------------------------------------------------------------------
// Answer shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDefinition {
    pub problem: String,
    pub why: String,
    pub change: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetAudience {
    pub audience: String,
    pub impact: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionExample {
    pub name: String,
    pub how_it_works: String,
    pub strengths: String,
    pub improvements: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub name: String,
    pub has_it: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mvp {
    pub simplest: String,
    pub testable: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSelection {
    pub tool: String,
    pub notes: String,
}

/// Title, problem and solution; used by both the wireframe and the project
/// summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectOutline {
    pub title: String,
    pub problem: String,
    pub solution: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostContent {
    pub intro: String,
    pub development: String,
    pub conclusion: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionStatus {
    Useful,
    Discard,
    #[default]
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    #[serde(default)]
    pub status: SuggestionStatus,
}

// ---------------------------------------------------------------------------
// CollaboratorPayload
// ---------------------------------------------------------------------------

/// What a collaborator hands back through `onComplete`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CollaboratorPayload {
    FocusHour { plan: String },
    ProblemDefinition(ProblemDefinition),
    TargetAudience(TargetAudience),
    ResearchSources { sources: Vec<String> },
    SolutionExamples { examples: Vec<SolutionExample> },
    Insights { insights: Vec<String> },
    SolutionSteps { steps: Vec<String> },
    Resources { resources: Vec<Resource> },
    Mvp(Mvp),
    ToolSelection(ToolSelection),
    Wireframe(ProjectOutline),
    ProjectSummary(ProjectOutline),
    TitleGenerator { title: String },
    ContentEditor(PostContent),
    CallToAction { cta: String },
    Feedback { feedback: Vec<String> },
    Suggestions { suggestions: Vec<Suggestion> },
    ReviewChecklist { checklist: Vec<bool> },
    PublishLink {
        #[serde(default)]
        link: String,
        #[serde(default)]
        platform: String,
    },
}

impl CollaboratorPayload {
    pub fn kind(&self) -> CollaboratorKind {
        match self {
            CollaboratorPayload::FocusHour { .. } => K::FocusHour,
            CollaboratorPayload::ProblemDefinition(_) => K::ProblemDefinition,
            CollaboratorPayload::TargetAudience(_) => K::TargetAudience,
            CollaboratorPayload::ResearchSources { .. } => K::ResearchSources,
            CollaboratorPayload::SolutionExamples { .. } => K::SolutionExamples,
            CollaboratorPayload::Insights { .. } => K::Insights,
            CollaboratorPayload::SolutionSteps { .. } => K::SolutionSteps,
            CollaboratorPayload::Resources { .. } => K::Resources,
            CollaboratorPayload::Mvp(_) => K::Mvp,
            CollaboratorPayload::ToolSelection(_) => K::ToolSelection,
            CollaboratorPayload::Wireframe(_) => K::Wireframe,
            CollaboratorPayload::ProjectSummary(_) => K::ProjectSummary,
            CollaboratorPayload::TitleGenerator { .. } => K::TitleGenerator,
            CollaboratorPayload::ContentEditor(_) => K::ContentEditor,
            CollaboratorPayload::CallToAction { .. } => K::CallToAction,
            CollaboratorPayload::Feedback { .. } => K::Feedback,
            CollaboratorPayload::Suggestions { .. } => K::Suggestions,
            CollaboratorPayload::ReviewChecklist { .. } => K::ReviewChecklist,
            CollaboratorPayload::PublishLink { .. } => K::PublishLink,
        }
    }
}

// ---------------------------------------------------------------------------
// DayAnswers
// ---------------------------------------------------------------------------

/// Structured answers accumulated on a day record. Every field stays empty
/// until the matching collaborator completes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DayAnswers {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus_plan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_definition: Option<ProblemDefinition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<TargetAudience>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub research_sources: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub solution_examples: Vec<SolutionExample>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub insights: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub solution_steps: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<Resource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mvp: Option<Mvp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_selection: Option<ToolSelection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wireframe: Option<ProjectOutline>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_summary: Option<ProjectOutline>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_content: Option<PostContent>,
    #[serde(rename = "postCTA", skip_serializing_if = "Option::is_none")]
    pub post_cta: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub feedback: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Suggestion>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub review_checklist: Vec<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_platform: Option<String>,
}

fn non_empty(s: String) -> Option<String> {
    (!s.trim().is_empty()).then_some(s)
}

impl DayAnswers {
    /// Store a collaborator payload in its slot.
    pub fn apply(&mut self, payload: CollaboratorPayload) {
        match payload {
            CollaboratorPayload::FocusHour { plan } => self.focus_plan = Some(plan),
            CollaboratorPayload::ProblemDefinition(p) => self.problem_definition = Some(p),
            CollaboratorPayload::TargetAudience(a) => self.target_audience = Some(a),
            CollaboratorPayload::ResearchSources { sources } => self.research_sources = sources,
            CollaboratorPayload::SolutionExamples { examples } => {
                self.solution_examples = examples
            }
            CollaboratorPayload::Insights { insights } => self.insights = insights,
            CollaboratorPayload::SolutionSteps { steps } => self.solution_steps = steps,
            CollaboratorPayload::Resources { resources } => self.resources = resources,
            CollaboratorPayload::Mvp(m) => self.mvp = Some(m),
            CollaboratorPayload::ToolSelection(t) => self.tool_selection = Some(t),
            CollaboratorPayload::Wireframe(w) => self.wireframe = Some(w),
            CollaboratorPayload::ProjectSummary(s) => self.project_summary = Some(s),
            CollaboratorPayload::TitleGenerator { title } => self.post_title = Some(title),
            CollaboratorPayload::ContentEditor(c) => self.post_content = Some(c),
            CollaboratorPayload::CallToAction { cta } => self.post_cta = Some(cta),
            CollaboratorPayload::Feedback { feedback } => self.feedback = feedback,
            CollaboratorPayload::Suggestions { suggestions } => self.suggestions = suggestions,
            CollaboratorPayload::ReviewChecklist { checklist } => {
                self.review_checklist = checklist
            }
            CollaboratorPayload::PublishLink { link, platform } => {
                // A skipped publish keeps whatever was saved before.
                if !link.trim().is_empty() || !platform.trim().is_empty() {
                    self.publish_link = non_empty(link);
                    self.publish_platform = non_empty(platform);
                }
            }
        }
    }

    /// Move a resource back to "still needed".
    pub fn mark_resource_pending(&mut self, name: &str) -> Result<()> {
        let resource = self
            .resources
            .iter_mut()
            .find(|r| r.name == name)
            .ok_or_else(|| JourneyError::ResourceNotFound(name.to_string()))?;
        resource.has_it = false;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
