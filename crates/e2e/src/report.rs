//! Markdown report rendering
//!
//! Renders a test run summary, a git snapshot, and a bundle verdict into a
//! Docusaurus-flavored Markdown document, then persists it under the
//! report history directory. Rendering is a pure function of its inputs;
//! the generation instant is threaded in by the caller.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::bundle::{BundleStatus, BundleVerdict, BUNDLE_MAX_SIZE, BUNDLE_WARNING_SIZE};
use crate::error::PipelineResult;
use crate::git::GitSnapshot;
use crate::results::RunSummary;

/// Three-way classification of a whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverallStatus {
    Success,
    Warning,
    Failure,
}

impl OverallStatus {
    /// Classify a run: any failure wins, then pending/skipped, then success
    pub fn from_summary(summary: &RunSummary) -> Self {
        if summary.total_failed > 0 {
            OverallStatus::Failure
        } else if summary.total_pending > 0 || summary.total_skipped > 0 {
            OverallStatus::Warning
        } else {
            OverallStatus::Success
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OverallStatus::Success => "success",
            OverallStatus::Warning => "warning",
            OverallStatus::Failure => "failure",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            OverallStatus::Success => "✅",
            OverallStatus::Warning => "⚠️",
            OverallStatus::Failure => "❌",
        }
    }

    /// Docusaurus admonition keyword for the status callout
    pub fn admonition(&self) -> &'static str {
        match self {
            OverallStatus::Success => "tip",
            OverallStatus::Warning => "warning",
            OverallStatus::Failure => "danger",
        }
    }
}

/// A rendered report ready to persist
#[derive(Debug, Clone)]
pub struct Report {
    pub content: String,
    pub filename: String,
}

/// Filename-safe timestamp: the ISO-8601 UTC instant with `:` and `.`
/// replaced and the fractional seconds dropped
fn file_timestamp(generated_at: DateTime<Utc>) -> String {
    generated_at.format("%Y-%m-%dT%H-%M-%S").to_string()
}

/// Render the regression report document
pub fn render_report(
    summary: &RunSummary,
    git: &GitSnapshot,
    bundle: &BundleVerdict,
    generated_at: DateTime<Utc>,
) -> Report {
    let status = OverallStatus::from_summary(summary);
    let stamp = file_timestamp(generated_at);
    let date_formatted = generated_at.format("%d/%m/%Y %H:%M").to_string();
    let duration_s = summary.total_duration as f64 / 1000.0;

    let mut md = String::new();

    // Front matter + header
    let _ = write!(
        md,
        "---\n\
         sidebar_position: 1\n\
         title: {emoji} Relatório {stamp}\n\
         description: Relatório de testes automatizados - {date}\n\
         ---\n\n\
         # {emoji} Relatório de Regressão\n\n\
         **Data:** {date}  \n\
         **Status:** {status}  \n\
         **Commit:** `{short_hash}` - {message}  \n\
         **Autor:** {author}  \n\
         **Branch:** `{branch}`\n\n\
         ---\n\n",
        emoji = status.emoji(),
        stamp = stamp,
        date = date_formatted,
        status = status.label().to_uppercase(),
        short_hash = git.short_hash,
        message = git.message,
        author = git.author,
        branch = git.branch,
    );

    // Summary table
    let status_line = match status {
        OverallStatus::Success => "Todos os testes passaram com sucesso! 🎉",
        OverallStatus::Failure => "Alguns testes falharam. Revise os detalhes abaixo.",
        OverallStatus::Warning => "Testes concluídos com avisos.",
    };
    let _ = write!(
        md,
        "## 📊 Resumo dos Testes\n\n\
         :::{admonition}[Status: {status}]\n\
         {status_line}\n\
         :::\n\n\
         | Métrica | Valor |\n\
         |---------|-------|\n\
         | **Total de Testes** | {total} |\n\
         | **✅ Passou** | {passed} |\n\
         | **❌ Falhou** | {failed} |\n\
         | **⏭️ Pendente** | {pending} |\n\
         | **⏸️ Ignorado** | {skipped} |\n\
         | **⏱️ Duração** | {duration:.2}s |\n\n\
         ---\n\n",
        admonition = status.admonition(),
        status = status.label().to_uppercase(),
        status_line = status_line,
        total = summary.total_tests,
        passed = summary.total_passed,
        failed = summary.total_failed,
        pending = summary.total_pending,
        skipped = summary.total_skipped,
        duration = duration_s,
    );

    // Bundle block
    let (bundle_admonition, bundle_title) = match bundle.status {
        BundleStatus::Success => ("tip", "Bundle OK"),
        BundleStatus::Warning => ("warning", "Bundle Grande"),
        BundleStatus::Error => ("danger", "Erro no Bundle"),
        BundleStatus::NotFound => ("caution", "Bundle Não Encontrado"),
    };
    let _ = write!(
        md,
        "## 📦 Performance do Bundle\n\n\
         :::{admonition}[{title}]\n\
         {message}\n\
         :::\n\n\
         | Métrica | Valor |\n\
         |---------|-------|\n\
         | **Tamanho** | {size_kb} KB ({size_mb} MB) |\n\
         | **Limite Máximo** | {max:.0} KB |\n\
         | **Limite de Aviso** | {warn:.0} KB |\n\n\
         ---\n\n",
        admonition = bundle_admonition,
        title = bundle_title,
        message = bundle.message,
        size_kb = bundle.size_kb,
        size_mb = bundle.size_mb,
        max = BUNDLE_MAX_SIZE as f64 / 1024.0,
        warn = BUNDLE_WARNING_SIZE as f64 / 1024.0,
    );

    // Per-spec test listing, only when the run produced specs
    if !summary.runs.is_empty() {
        md.push_str("## 🧪 Detalhes dos Testes\n\n");

        for run in &summary.runs {
            let name = if run.name.is_empty() { "Test Spec" } else { &run.name };
            let _ = write!(md, "### 📄 {}\n\n", name);

            for test in &run.tests {
                let duration = test
                    .duration
                    .map(|ms| format!(" ({:.2}s)", ms as f64 / 1000.0))
                    .unwrap_or_default();
                let _ = write!(
                    md,
                    "- {} **{}**{}\n",
                    test.state.glyph(),
                    test.title.join(" > "),
                    duration,
                );

                if let Some(error) = &test.display_error {
                    let _ = write!(md, "  ```\n  {}\n  ```\n", error);
                }
            }

            md.push('\n');
        }

        md.push_str("---\n\n");
    }

    // Commit metadata + generation stamp
    let _ = write!(
        md,
        "## 🔍 Informações do Commit\n\n\
         ```\n\
         Hash: {hash}\n\
         Autor: {author} <{email}>\n\
         Data: {timestamp}\n\
         Mensagem: {message}\n\
         Branch: {branch}\n\
         ```\n\n\
         ---\n\n\
         *Relatório gerado automaticamente em {generated}*\n",
        hash = git.hash,
        author = git.author,
        email = git.email,
        timestamp = git.timestamp,
        message = git.message,
        branch = git.branch,
        generated = generated_at.to_rfc3339(),
    );

    Report {
        content: md,
        filename: format!("relatorio-{}.md", stamp),
    }
}

/// Persist a report under `dir`, creating the directory when absent.
/// Same-named files are overwritten; the write is not atomic.
pub fn save_report(dir: &Path, report: &Report) -> PipelineResult<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let path = dir.join(&report.filename);
    std::fs::write(&path, &report.content)?;

    info!("Report saved: {}", path.display());
    Ok(path)
}
