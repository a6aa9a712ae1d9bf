use serde::Serialize;
use tera::{Context, Tera};

use super::ProfileListing;
use crate::core::{
    AdHocAnalysis, DependencyIssue, MigrationPlan, MigrationReport, PatternHit, ScanResult,
};
use crate::error::Result;

/// Characters of research content quoted next to a correlated issue
const SNIPPET_CHARS: usize = 150;
/// Affected files listed per plan step
const STEP_FILES: usize = 10;

const TEMPLATES: &[(&str, &str)] = &[
    ("scan", include_str!("../../templates/scan.txt.tera")),
    ("report", include_str!("../../templates/report.txt.tera")),
    ("plan", include_str!("../../templates/plan.txt.tera")),
    ("adhoc", include_str!("../../templates/adhoc.txt.tera")),
    ("profiles", include_str!("../../templates/profiles.txt.tera")),
];

#[derive(Serialize)]
struct FileView<'a> {
    path: String,
    difficulty: String,
    hits: &'a [PatternHit],
}

#[derive(Serialize)]
struct CorrelatedView<'a> {
    pattern: &'a PatternHit,
    path: String,
    research: Vec<SnippetView<'a>>,
}

#[derive(Serialize)]
struct SnippetView<'a> {
    label: &'a str,
    url: &'a str,
    snippet: String,
}

#[derive(Serialize)]
struct StepView<'a> {
    title: &'a str,
    description: &'a str,
    effort: String,
    file_count: usize,
    files: Vec<String>,
    more_files: usize,
}

#[derive(Serialize)]
struct PhaseView<'a> {
    order: usize,
    name: &'a str,
    description: &'a str,
    steps: Vec<StepView<'a>>,
}

/// Renders results through the embedded tera templates
pub struct TextRenderer {
    tera: Tera,
    max_listed_files: usize,
}

impl TextRenderer {
    pub fn new(max_listed_files: usize) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())?;
        tera.autoescape_on(Vec::new());
        Ok(Self {
            tera,
            max_listed_files,
        })
    }

    pub fn scan(&self, scan: &ScanResult) -> Result<String> {
        let mut files: Vec<_> = scan.files.iter().collect();
        // stable: equal counts keep path order
        files.sort_by(|a, b| b.hits.len().cmp(&a.hits.len()));

        let listed: Vec<FileView<'_>> = files
            .iter()
            .take(self.max_listed_files)
            .map(|f| FileView {
                path: scan.relative_path(&f.file),
                difficulty: format!("{:?}", f.difficulty).to_lowercase(),
                hits: &f.hits,
            })
            .collect();

        let mut context = Context::new();
        context.insert("profile_id", &scan.profile_id);
        context.insert("project_path", &scan.project_path.display().to_string());
        context.insert("stats", &scan.stats);
        context.insert("dependency_issues", &dependency_lines(&scan.dependency_issues));
        context.insert("files", &listed);
        context.insert("more_files", &files.len().saturating_sub(listed.len()));
        context.insert(
            "unreadable",
            &scan
                .unreadable_files
                .iter()
                .map(|u| format!("{}: {}", scan.relative_path(&u.file), u.reason))
                .collect::<Vec<_>>(),
        );

        Ok(self.tera.render("scan", &context)?)
    }

    pub fn report(&self, report: &MigrationReport) -> Result<String> {
        let scan = &report.scan_result;
        let correlated: Vec<CorrelatedView<'_>> = report
            .correlated_issues
            .iter()
            .map(|issue| CorrelatedView {
                pattern: &issue.pattern,
                path: scan.relative_path(&issue.pattern.file),
                research: issue
                    .related_research
                    .iter()
                    .map(|entry| SnippetView {
                        label: &entry.label,
                        url: &entry.url,
                        snippet: snippet(&entry.content),
                    })
                    .collect(),
            })
            .collect();

        let mut context = report_context(report);
        context.insert("correlated", &correlated);
        context.insert("dependency_issues", &dependency_lines(&report.dependency_issues));

        Ok(self.tera.render("report", &context)?)
    }

    pub fn plan(&self, plan: &MigrationPlan) -> Result<String> {
        let phases: Vec<PhaseView<'_>> = plan
            .phases
            .iter()
            .map(|phase| PhaseView {
                order: phase.order,
                name: &phase.name,
                description: &phase.description,
                steps: phase
                    .steps
                    .iter()
                    .map(|step| StepView {
                        title: &step.title,
                        description: &step.description,
                        effort: step.effort.to_string().to_uppercase(),
                        file_count: step.affected_files.len(),
                        files: step.affected_files.iter().take(STEP_FILES).cloned().collect(),
                        more_files: step.affected_files.len().saturating_sub(STEP_FILES),
                    })
                    .collect(),
            })
            .collect();

        let mut context = Context::new();
        context.insert("profile_id", &plan.profile_id);
        context.insert("project_path", &plan.project_path.display().to_string());
        context.insert("risk_level", &plan.risk_level.as_str().to_uppercase());
        context.insert("total_files", &plan.total_files);
        context.insert("estimated_effort", &plan.estimated_effort.to_string());
        context.insert("summary", &quote(&plan.summary));
        context.insert("phases", &phases);

        Ok(self.tera.render("plan", &context)?)
    }

    /// Matched profiles render as a full report; otherwise the inventory view
    pub fn adhoc(&self, analysis: &AdHocAnalysis) -> Result<String> {
        let body = match &analysis.matched_profile {
            Some(profile) => format!(
                "Matched predefined profile: {}\n\n{}",
                profile,
                self.report(&analysis.report)?
            ),
            None => {
                let mut context = report_context(&analysis.report);
                context.insert("source", analysis.source.trim());
                context.insert("target", analysis.target.trim());
                context.insert("summary", &quote(&analysis.report.summary));
                self.tera.render("adhoc", &context)?
            }
        };

        Ok(format!("{}\n\n{}", body.trim_end(), self.plan(&analysis.plan)?))
    }

    pub fn profiles(&self, listing: &ProfileListing) -> Result<String> {
        let mut context = Context::new();
        context.insert("profiles", &listing.profiles);
        context.insert("detection_requested", &listing.detected.is_some());
        context.insert("detected", &listing.detected.clone().flatten());
        Ok(self.tera.render("profiles", &context)?)
    }

}

/// Fields shared by the rule-based and ad-hoc report templates
fn report_context(report: &MigrationReport) -> Context {
    let mut context = Context::new();
    context.insert("profile_id", &report.profile_id);
    context.insert("project_path", &report.project_path.display().to_string());
    context.insert("risk_level", &report.risk_level.as_str().to_uppercase());
    context.insert("risk_score", &report.risk_score);
    context.insert("stats", &report.scan_result.stats);
    context.insert("research_available", &report.research_available);
    context.insert("research", &report.research_summary);
    context.insert("research_errors", &report.research_summary.errors.join("; "));
    context
}

/// Plain-text form of a failed command
pub fn render_text_failure(message: &str) -> String {
    format!("Error: {}", message)
}

fn dependency_lines(issues: &[DependencyIssue]) -> Vec<String> {
    issues
        .iter()
        .map(|d| format!("{} ({}) [{}]: {}", d.name, d.current_version, d.severity, d.message))
        .collect()
}

fn snippet(content: &str) -> String {
    content
        .chars()
        .take(SNIPPET_CHARS)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect()
}

fn quote(text: &str) -> String {
    text.lines()
        .map(|line| format!("> {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}
