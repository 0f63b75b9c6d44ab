//! Output formatters for recommendations, gap reports, risk views and listings

use crate::analysis::gap::{GapReport, SkillGap};
use crate::analysis::learning_path::LearningPath;
use crate::analysis::risk::{RiskCategory, RiskProfile};
use crate::catalogue::skills::SkillDimension;
use crate::config::OutputFormat;
use crate::error::Result;
use crate::pipeline::{
    CareerRecommendation, CourseHit, FamilySummary, LevelSummary, OccupationDetail, OccupationRisk, OccupationSummary,
    PlatformListing, RecommendationReport, RiskDistribution, SkillsGapResult,
};
use colored::{Color, Colorize};
use serde::Serialize;
use std::path::Path;

/// Renders every engine result in one output format
pub trait OutputFormatter {
    fn format_recommendations(&self, report: &RecommendationReport) -> Result<String>;
    fn format_skills_gap(&self, result: &SkillsGapResult) -> Result<String>;
    fn format_occupations(&self, title: &str, entries: &[OccupationSummary]) -> Result<String>;
    fn format_occupation(&self, detail: &OccupationDetail) -> Result<String>;
    fn format_risk_distribution(&self, distribution: &RiskDistribution) -> Result<String>;
    fn format_courses(&self, skill: &str, hits: &[CourseHit]) -> Result<String>;
    fn format_families(&self, families: &[FamilySummary]) -> Result<String>;
    fn format_occupation_risk(&self, risk: &OccupationRisk) -> Result<String>;
    fn format_dimensions(&self, dimensions: &[SkillDimension]) -> Result<String>;
    fn format_platforms(&self, listing: &PlatformListing) -> Result<String>;
    fn format_levels(&self, levels: &[LevelSummary]) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Colored terminal output
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Picks the formatter for the requested output format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            3 => "▒",
            _ => "░",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            3 => Color::Yellow,
            _ => Color::White,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_match_badge(&self, score: f32) -> String {
        let (badge, color) = match score as u32 {
            80..=100 => ("STRONG", Color::Green),
            60..=79 => ("GOOD", Color::BrightGreen),
            40..=59 => ("FAIR", Color::Yellow),
            _ => ("WEAK", Color::BrightRed),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn risk_color(category: RiskCategory) -> Color {
        match category {
            RiskCategory::Low => Color::Green,
            RiskCategory::Medium => Color::Yellow,
            RiskCategory::High => Color::BrightRed,
            RiskCategory::VeryHigh => Color::Red,
        }
    }

    fn format_risk(&self, risk: &RiskProfile) -> String {
        format!(
            "{} risk ({:.0}/100), future-proof {:.0}/100",
            self.colorize(risk.risk_category.name(), Self::risk_color(risk.risk_category)),
            risk.risk_score,
            risk.future_proof_score
        )
    }

    fn format_gap_line(&self, gap: &SkillGap, color: Color) -> String {
        format!(
            "  • {:<28} current {:.1} / required {:.1}  (gap {:+.1})\n",
            self.colorize(gap.label, color),
            gap.current,
            gap.required,
            gap.gap
        )
    }

    fn format_gap_report(&self, report: &GapReport) -> String {
        let mut output = format!("Skill alignment: {:.0}%\n", report.alignment_pct);

        if !report.critical.is_empty() {
            output.push_str(&self.colorize("Critical gaps:\n", Color::Red));
            for gap in &report.critical {
                output.push_str(&self.format_gap_line(gap, Color::Red));
            }
        }
        if !report.moderate.is_empty() {
            output.push_str(&self.colorize("Moderate gaps:\n", Color::Yellow));
            let shown = if self.detailed { report.moderate.len() } else { 5 };
            for gap in report.moderate.iter().take(shown) {
                output.push_str(&self.format_gap_line(gap, Color::Yellow));
            }
            if report.moderate.len() > shown {
                output.push_str(&format!("  … and {} more\n", report.moderate.len() - shown));
            }
        }
        if !report.strengths.is_empty() {
            let labels: Vec<&str> = report.strengths.iter().take(5).map(|g| g.label).collect();
            output.push_str(&format!("Strengths: {}\n", self.colorize(&labels.join(", "), Color::Green)));
        }
        output
    }

    fn format_learning_path(&self, path: &LearningPath) -> String {
        if path.is_empty() {
            return "No courses matched the identified gaps.\n".to_string();
        }

        let mut output = String::new();
        for stage in &path.stages {
            output.push_str(&format!(
                "{} ({:.0}h)\n",
                self.colorize(&stage.title, Color::Cyan),
                stage.hours
            ));
            for course in &stage.courses {
                let price = if course.is_free { "free" } else { "paid" };
                output.push_str(&format!(
                    "  📚 {} [{}; {}] for {}\n",
                    course.title,
                    course.platform,
                    price,
                    course.skill_gap.replace('_', " ")
                ));
                if self.detailed {
                    if let Some(url) = &course.url {
                        output.push_str(&format!("     {}\n", url));
                    }
                }
            }
        }
        output.push_str(&format!("Total: {} courses, {:.0} hours\n", path.course_count(), path.total_hours));
        output
    }

    fn format_career(&self, career: &CareerRecommendation) -> String {
        let mut output = self.format_header(&format!("#{} {} ({})", career.rank, career.title, career.code), 3);
        output.push_str(&format!(
            "Match: {:.1}% {} | Family: {} | Zone {} | Demand: {}\n",
            career.match_score,
            self.format_match_badge(career.match_score),
            career.family,
            career.zone,
            career.demand
        ));
        if let Some(wage) = career.median_wage {
            output.push_str(&format!("Median wage: ${:.0}\n", wage));
        }
        output.push_str(&format!("Automation: {}\n", self.format_risk(&career.risk)));

        if let Some(report) = &career.gap_report {
            output.push_str(&self.format_gap_report(report));
        }
        if let Some(path) = &career.learning_path {
            output.push_str(&self.format_learning_path(path));
        }
        output
    }

    fn format_summary_table(&self, entries: &[OccupationSummary]) -> String {
        let mut output = format!(
            "{:<12} {:<44} {:<22} {:>6} {:>10}\n",
            "Code", "Title", "Family", "Risk", "Future"
        );
        for entry in entries {
            output.push_str(&format!(
                "{:<12} {:<44} {:<22} {:>6.1} {:>10.1}\n",
                entry.code,
                truncate(&entry.title, 44),
                entry.family.name(),
                entry.risk_score,
                entry.future_proof_score
            ));
        }
        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_recommendations(&self, report: &RecommendationReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("🧭 CAREER RECOMMENDATIONS", 1));
        output.push_str(&format!(
            "Generated: {} | Pipeline: {}ms | {} candidates\n",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.pipeline_ms,
            report.candidates_retrieved
        ));
        output.push_str(&format!(
            "Profile: {} (education zone {})\n",
            report.user_type, report.education_zone
        ));
        if report.degraded {
            output.push_str(&self.colorize(
                &format!("⚠️  Degraded mode: encoder {}, ranker {}\n", report.encoder, report.ranker),
                Color::Yellow,
            ));
        }
        if self.detailed {
            for warning in &report.warnings {
                output.push_str(&format!("  ⚠️  {}: {}\n", warning.artifact, warning.message));
            }
        }

        if !report.resolved_skills.is_empty() {
            let terms: Vec<String> = report
                .resolved_skills
                .iter()
                .map(|s| format!("{} → {}", s.term, s.dimension.replace('_', " ")))
                .collect();
            output.push_str(&format!("Recognised skills: {}\n", terms.join(", ")));
        }

        output.push_str(&self.format_header("Top Careers", 2));
        for career in &report.careers {
            output.push_str(&self.format_career(career));
        }

        if !report.transferable_skills.is_empty() {
            output.push_str(&self.format_header("✅ Transferable Skills", 2));
            for skill in &report.transferable_skills {
                output.push_str(&format!("  • {}\n", self.colorize(skill.label, Color::Green)));
            }
        }

        Ok(output)
    }

    fn format_skills_gap(&self, result: &SkillsGapResult) -> Result<String> {
        let mut output = self.format_header(
            &format!("🎯 SKILLS GAP: {} ({})", result.occupation.title, result.occupation.code),
            1,
        );
        output.push_str(&format!("Automation: {}\n", self.format_risk(&result.risk)));
        output.push_str(&self.format_header("Gap Analysis", 2));
        output.push_str(&self.format_gap_report(&result.gap_report));
        output.push_str(&self.format_header("📋 Learning Path", 2));
        output.push_str(&self.format_learning_path(&result.learning_path));
        Ok(output)
    }

    fn format_occupations(&self, title: &str, entries: &[OccupationSummary]) -> Result<String> {
        let mut output = self.format_header(title, 1);
        if entries.is_empty() {
            output.push_str("No occupations matched.\n");
        } else {
            output.push_str(&self.format_summary_table(entries));
        }
        Ok(output)
    }

    fn format_occupation(&self, detail: &OccupationDetail) -> Result<String> {
        let occupation = &detail.occupation;
        let mut output = self.format_header(&format!("{} ({})", occupation.title, occupation.code), 1);
        output.push_str(&format!(
            "Family: {} | Zone {} | Demand: {}\n",
            occupation.family, occupation.zone, occupation.demand
        ));
        if let Some(wage) = occupation.median_wage {
            output.push_str(&format!("Median wage: ${:.0}\n", wage));
        }
        if !occupation.description.is_empty() {
            output.push_str(&format!("\n{}\n", occupation.description));
        }

        output.push_str(&self.format_header("Automation Risk", 2));
        output.push_str(&format!("{}\n", self.format_risk(&detail.risk)));
        output.push_str(&format!("{}\n", detail.risk.explanation));
        for advice in detail.risk.mitigation_advice {
            output.push_str(&format!("  💡 {}\n", advice));
        }

        output.push_str(&self.format_header("Key Skills", 2));
        for (label, level) in detail.top_skills.iter().take(8) {
            output.push_str(&format!("  • {:<28} {:.1}\n", label, level));
        }
        Ok(output)
    }

    fn format_risk_distribution(&self, distribution: &RiskDistribution) -> Result<String> {
        let mut output = self.format_header("🤖 AUTOMATION RISK DISTRIBUTION", 1);
        output.push_str(&format!(
            "{} occupations, mean risk {:.1}\n",
            distribution.total, distribution.mean_risk
        ));

        output.push_str(&self.format_header("By Category", 2));
        for entry in &distribution.by_category {
            let bar = "█".repeat((entry.percentage / 2.5).round() as usize);
            output.push_str(&format!(
                "  {:<10} {:>4} ({:>5.1}%) {}\n",
                entry.category.name(),
                entry.count,
                entry.percentage,
                self.colorize(&bar, Self::risk_color(entry.category))
            ));
        }

        output.push_str(&self.format_header("By Family", 2));
        for family in &distribution.by_family {
            output.push_str(&format!(
                "  {:<26} {:>4} occupations, risk {:>5.1}, future-proof {:>5.1}\n",
                family.family.name(),
                family.occupations,
                family.mean_risk,
                family.mean_future_proof
            ));
        }
        Ok(output)
    }

    fn format_courses(&self, skill: &str, hits: &[CourseHit]) -> Result<String> {
        let mut output = self.format_header(&format!("📚 COURSES FOR \"{}\"", skill), 1);
        if hits.is_empty() {
            output.push_str("No courses matched.\n");
            return Ok(output);
        }
        for hit in hits {
            let course = &hit.course;
            output.push_str(&format!(
                "  {:>5.1}%  {} [{}; {}]\n",
                hit.relevance_pct,
                self.colorize(&course.title, Color::Cyan),
                course.platform,
                course.level
            ));
            if self.detailed {
                if let Some(url) = &course.url {
                    output.push_str(&format!("          {}\n", url));
                }
            }
        }
        Ok(output)
    }

    fn format_families(&self, families: &[FamilySummary]) -> Result<String> {
        let mut output = self.format_header("CAREER FAMILIES", 1);
        for family in families {
            output.push_str(&format!("  {:<26} {:>4}\n", family.name, family.occupations));
        }
        Ok(output)
    }

    fn format_occupation_risk(&self, view: &OccupationRisk) -> Result<String> {
        let occupation = &view.occupation;
        let risk = &view.risk;
        let mut output = self.format_header(
            &format!("🤖 AUTOMATION RISK: {} ({})", occupation.title, occupation.code),
            1,
        );
        output.push_str(&format!("{}\n", self.format_risk(risk)));
        output.push_str(&format!("  Skill-derived risk: {:.1}\n", risk.skill_derived_risk));
        if let Some(empirical) = risk.empirical_risk {
            output.push_str(&format!("  Empirical risk:     {:.1}\n", empirical));
        }
        if let Some(percentile) = risk.wage_percentile {
            output.push_str(&format!("  Wage percentile:    {:.0}\n", percentile));
        }
        output.push_str(&format!("\n{}\n", risk.explanation));
        for advice in risk.mitigation_advice {
            output.push_str(&format!("  💡 {}\n", advice));
        }
        Ok(output)
    }

    fn format_dimensions(&self, dimensions: &[SkillDimension]) -> Result<String> {
        let mut output = self.format_header("SKILL DIMENSIONS", 1);
        for dimension in dimensions {
            output.push_str(&format!(
                "  {:<30} {}\n",
                self.colorize(dimension.label, Color::Cyan),
                dimension.key
            ));
            if self.detailed {
                output.push_str(&format!("      {}\n", dimension.description));
            }
        }
        Ok(output)
    }

    fn format_platforms(&self, listing: &PlatformListing) -> Result<String> {
        let mut output = self.format_header("COURSE PLATFORMS", 1);
        for platform in &listing.platforms {
            output.push_str(&format!("  {:<26} {:>5}\n", platform.name, platform.course_count));
        }
        output.push_str(&format!("\n{} courses in total\n", listing.total_courses));
        Ok(output)
    }

    fn format_levels(&self, levels: &[LevelSummary]) -> Result<String> {
        let mut output = self.format_header("COURSE LEVELS", 1);
        for level in levels {
            let user_types: Vec<&str> = level.user_types.iter().map(|u| u.as_str()).collect();
            output.push_str(&format!(
                "  {:<14} {:>5} courses  favoured by: {}\n",
                level.level.name(),
                level.course_count,
                user_types.join(", ")
            ));
        }
        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_recommendations(&self, report: &RecommendationReport) -> Result<String> {
        self.render(report)
    }

    fn format_skills_gap(&self, result: &SkillsGapResult) -> Result<String> {
        self.render(result)
    }

    fn format_occupations(&self, _title: &str, entries: &[OccupationSummary]) -> Result<String> {
        self.render(entries)
    }

    fn format_occupation(&self, detail: &OccupationDetail) -> Result<String> {
        self.render(detail)
    }

    fn format_risk_distribution(&self, distribution: &RiskDistribution) -> Result<String> {
        self.render(distribution)
    }

    fn format_courses(&self, _skill: &str, hits: &[CourseHit]) -> Result<String> {
        self.render(hits)
    }

    fn format_families(&self, families: &[FamilySummary]) -> Result<String> {
        self.render(families)
    }

    fn format_occupation_risk(&self, risk: &OccupationRisk) -> Result<String> {
        self.render(risk)
    }

    fn format_dimensions(&self, dimensions: &[SkillDimension]) -> Result<String> {
        self.render(dimensions)
    }

    fn format_platforms(&self, listing: &PlatformListing) -> Result<String> {
        self.render(listing)
    }

    fn format_levels(&self, levels: &[LevelSummary]) -> Result<String> {
        self.render(levels)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn gap_table(report: &GapReport) -> String {
        let mut output = format!("**Skill alignment:** {:.0}%\n\n", report.alignment_pct);
        let gaps: Vec<&SkillGap> = report.critical.iter().chain(report.moderate.iter()).collect();
        if gaps.is_empty() {
            output.push_str("No skill gaps identified.\n\n");
            return output;
        }

        output.push_str("| Skill | Current | Required | Gap | Severity |\n");
        output.push_str("|-------|---------|----------|-----|----------|\n");
        for gap in gaps {
            output.push_str(&format!(
                "| {} | {:.1} | {:.1} | {:.1} | {:?} |\n",
                gap.label, gap.current, gap.required, gap.gap, gap.class
            ));
        }
        output.push('\n');
        output
    }

    fn learning_path(path: &LearningPath) -> String {
        if path.is_empty() {
            return "_No courses matched the identified gaps._\n\n".to_string();
        }

        let mut output = String::new();
        for stage in &path.stages {
            output.push_str(&format!("**{}** ({:.0}h)\n\n", stage.title, stage.hours));
            for course in &stage.courses {
                let title = match &course.url {
                    Some(url) => format!("[{}]({})", course.title, url),
                    None => course.title.clone(),
                };
                output.push_str(&format!(
                    "- {} ({}) for *{}*\n",
                    title,
                    course.platform,
                    course.skill_gap.replace('_', " ")
                ));
            }
            output.push('\n');
        }
        output.push_str(&format!(
            "Total: {} courses, {:.0} hours\n\n",
            path.course_count(),
            path.total_hours
        ));
        output
    }

    fn summary_table(entries: &[OccupationSummary]) -> String {
        let mut output = String::from("| Code | Title | Family | Risk | Category | Future-proof |\n");
        output.push_str("|------|-------|--------|------|----------|--------------|\n");
        for entry in entries {
            output.push_str(&format!(
                "| {} | {} | {} | {:.1} | {} | {:.1} |\n",
                entry.code,
                entry.title,
                entry.family.name(),
                entry.risk_score,
                entry.risk_category.name(),
                entry.future_proof_score
            ));
        }
        output
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_recommendations(&self, report: &RecommendationReport) -> Result<String> {
        let mut output = String::from("# 🧭 Career Recommendations\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Pipeline:** {}ms | **Encoder:** `{}` | **Ranker:** `{}`\n\n",
                report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.pipeline_ms,
                report.encoder,
                report.ranker
            ));
        }
        if report.degraded {
            output.push_str("> ⚠️ Running in degraded mode; results use fallback models.\n\n");
        }

        output.push_str("| Rank | Career | Match | Risk | Future-proof |\n");
        output.push_str("|------|--------|-------|------|--------------|\n");
        for career in &report.careers {
            output.push_str(&format!(
                "| {} | {} | {:.1}% | {} | {:.0} |\n",
                career.rank,
                career.title,
                career.match_score,
                career.risk.risk_category.name(),
                career.risk.future_proof_score
            ));
        }
        output.push('\n');

        for career in &report.careers {
            if career.gap_report.is_none() && career.learning_path.is_none() {
                continue;
            }
            output.push_str(&format!("## {}. {} ({})\n\n", career.rank, career.title, career.code));
            output.push_str(&format!("{}\n\n", career.risk.explanation));
            if let Some(report) = &career.gap_report {
                output.push_str("### Skills Gap\n\n");
                output.push_str(&Self::gap_table(report));
            }
            if let Some(path) = &career.learning_path {
                output.push_str("### Learning Path\n\n");
                output.push_str(&Self::learning_path(path));
            }
        }

        if !report.transferable_skills.is_empty() {
            output.push_str("## Transferable Skills\n\n");
            for skill in &report.transferable_skills {
                output.push_str(&format!("- {}\n", skill.label));
            }
            output.push('\n');
        }

        Ok(output)
    }

    fn format_skills_gap(&self, result: &SkillsGapResult) -> Result<String> {
        let mut output = format!(
            "# 🎯 Skills Gap: {} ({})\n\n",
            result.occupation.title, result.occupation.code
        );
        output.push_str(&format!(
            "**Automation risk:** {} ({:.0}/100) | **Future-proof:** {:.0}/100\n\n",
            result.risk.risk_category.name(),
            result.risk.risk_score,
            result.risk.future_proof_score
        ));
        output.push_str("## Gap Analysis\n\n");
        output.push_str(&Self::gap_table(&result.gap_report));
        output.push_str("## Learning Path\n\n");
        output.push_str(&Self::learning_path(&result.learning_path));
        Ok(output)
    }

    fn format_occupations(&self, title: &str, entries: &[OccupationSummary]) -> Result<String> {
        Ok(format!("# {}\n\n{}", title, Self::summary_table(entries)))
    }

    fn format_occupation(&self, detail: &OccupationDetail) -> Result<String> {
        let occupation = &detail.occupation;
        let mut output = format!("# {} ({})\n\n", occupation.title, occupation.code);
        output.push_str(&format!(
            "**Family:** {} | **Zone:** {} | **Demand:** {}\n\n",
            occupation.family, occupation.zone, occupation.demand
        ));
        if !occupation.description.is_empty() {
            output.push_str(&format!("{}\n\n", occupation.description));
        }
        output.push_str("## Automation Risk\n\n");
        output.push_str(&format!(
            "**{}** ({:.0}/100). {}\n\n",
            detail.risk.risk_category.name(),
            detail.risk.risk_score,
            detail.risk.explanation
        ));
        for advice in detail.risk.mitigation_advice {
            output.push_str(&format!("- {}\n", advice));
        }
        output.push_str("\n## Key Skills\n\n");
        for (label, level) in &detail.top_skills {
            output.push_str(&format!("- {}: {:.1}\n", label, level));
        }
        Ok(output)
    }

    fn format_risk_distribution(&self, distribution: &RiskDistribution) -> Result<String> {
        let mut output = format!(
            "# 🤖 Automation Risk Distribution\n\n{} occupations, mean risk {:.1}\n\n",
            distribution.total, distribution.mean_risk
        );
        output.push_str("| Category | Count | Share |\n|----------|-------|-------|\n");
        for entry in &distribution.by_category {
            output.push_str(&format!(
                "| {} | {} | {:.1}% |\n",
                entry.category.name(),
                entry.count,
                entry.percentage
            ));
        }
        output.push_str("\n| Family | Occupations | Mean risk | Mean future-proof |\n");
        output.push_str("|--------|-------------|-----------|-------------------|\n");
        for family in &distribution.by_family {
            output.push_str(&format!(
                "| {} | {} | {:.1} | {:.1} |\n",
                family.family.name(),
                family.occupations,
                family.mean_risk,
                family.mean_future_proof
            ));
        }
        Ok(output)
    }

    fn format_courses(&self, skill: &str, hits: &[CourseHit]) -> Result<String> {
        let mut output = format!("# 📚 Courses for \"{}\"\n\n", skill);
        output.push_str("| Relevance | Course | Platform | Level |\n|-----------|--------|----------|-------|\n");
        for hit in hits {
            output.push_str(&format!(
                "| {:.1}% | {} | {} | {} |\n",
                hit.relevance_pct, hit.course.title, hit.course.platform, hit.course.level
            ));
        }
        Ok(output)
    }

    fn format_families(&self, families: &[FamilySummary]) -> Result<String> {
        let mut output = String::from("# Career Families\n\n| Family | Occupations |\n|--------|-------------|\n");
        for family in families {
            output.push_str(&format!("| {} | {} |\n", family.name, family.occupations));
        }
        Ok(output)
    }

    fn format_occupation_risk(&self, view: &OccupationRisk) -> Result<String> {
        let occupation = &view.occupation;
        let risk = &view.risk;
        let mut output = format!("# 🤖 Automation Risk: {} ({})\n\n", occupation.title, occupation.code);
        output.push_str("| Measure | Value |\n|---------|-------|\n");
        output.push_str(&format!("| Category | {} |\n", risk.risk_category.name()));
        output.push_str(&format!("| Risk score | {:.1} |\n", risk.risk_score));
        output.push_str(&format!("| Future-proof score | {:.1} |\n", risk.future_proof_score));
        output.push_str(&format!("| Skill-derived risk | {:.1} |\n", risk.skill_derived_risk));
        if let Some(empirical) = risk.empirical_risk {
            output.push_str(&format!("| Empirical risk | {:.1} |\n", empirical));
        }
        output.push_str(&format!("\n{}\n\n", risk.explanation));
        for advice in risk.mitigation_advice {
            output.push_str(&format!("- {}\n", advice));
        }
        Ok(output)
    }

    fn format_dimensions(&self, dimensions: &[SkillDimension]) -> Result<String> {
        let mut output = String::from("# Skill Dimensions\n\n| Key | Name | Description |\n|-----|------|-------------|\n");
        for dimension in dimensions {
            output.push_str(&format!(
                "| {} | {} | {} |\n",
                dimension.key, dimension.label, dimension.description
            ));
        }
        Ok(output)
    }

    fn format_platforms(&self, listing: &PlatformListing) -> Result<String> {
        let mut output = String::from("# Course Platforms\n\n| Platform | Courses |\n|----------|---------|\n");
        for platform in &listing.platforms {
            output.push_str(&format!("| {} | {} |\n", platform.name, platform.course_count));
        }
        output.push_str(&format!("\n**Total courses:** {}\n", listing.total_courses));
        Ok(output)
    }

    fn format_levels(&self, levels: &[LevelSummary]) -> Result<String> {
        let mut output = String::from("# Course Levels\n\n| Level | Courses | Favoured by |\n|-------|---------|-------------|\n");
        for level in levels {
            let user_types: Vec<&str> = level.user_types.iter().map(|u| u.as_str()).collect();
            output.push_str(&format!(
                "| {} | {} | {} |\n",
                level.level.name(),
                level.course_count,
                user_types.join(", ")
            ));
        }
        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true, true)
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn formatter(&self, format: OutputFormat) -> &dyn OutputFormatter {
        match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: OutputFormat, stem: &str, timestamp: bool) -> String {
    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}{}.txt", stem, timestamp_suffix),
        OutputFormat::Json => format!("{}{}.json", stem, timestamp_suffix),
        OutputFormat::Markdown => format!("{}{}.md", stem, timestamp_suffix),
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut short: String = text.chars().take(width.saturating_sub(1)).collect();
        short.push('…');
        short
    }
}
