use clap::Args;
use serde::Serialize;

use crate::commands::sync::target_branch;
use crate::commands::{select_submodules, CommandContext};
use crate::core::error::Result;
use crate::core::state::SyncState;
use crate::core::{
    classify, hash_tree, print_detail, print_info, print_section_header, Observation, Submodule,
    SyncStatus, Workspace, STATE_VERSION,
};

#[derive(Args, Debug, Default)]
pub struct StatusArgs {
    /// Show a single submodule instead of all of them
    pub name: Option<String>,

    /// Emit a machine-readable JSON document instead of the table
    #[arg(long)]
    pub json: bool,
}

/// The `status --json` document. Field layout is a stable machine interface.
#[derive(Debug, Serialize)]
struct StatusReport {
    version: &'static str,
    parent_branch: String,
    submodules: Vec<SubmoduleRow>,
}

#[derive(Debug, Serialize)]
struct SubmoduleRow {
    name: String,
    path: String,
    current_branch: String,
    expected_branch: String,
    status: SyncStatus,
    modified_files: usize,
    ahead: usize,
    behind: usize,
    exists: bool,
}

/// Classify every submodule and render the result as a table or JSON.
pub fn execute_status(ctx: CommandContext, args: StatusArgs) -> Result<()> {
    let ws = Workspace::open()?;
    let config = ws.load_config()?;
    let submodules = select_submodules(&config, args.name.as_deref())?;

    let parent_branch = ws.parent_branch();
    let state = ws.load_state()?;
    // --verbose is a global flag; it turns on the remote comparison.
    let deep = ctx.verbose;

    let rows: Vec<SubmoduleRow> = submodules
        .into_iter()
        .map(|sub| observe(&ws, sub, &state, parent_branch.as_deref(), deep))
        .collect::<Result<_>>()?;

    let report = StatusReport {
        version: STATE_VERSION,
        parent_branch: parent_branch.unwrap_or_default(),
        submodules: rows,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.submodules.is_empty() {
        if !ctx.quiet {
            print_info("No submodules configured");
        }
        return Ok(());
    }

    render_table(&report, deep, ctx);
    Ok(())
}

fn observe(
    ws: &Workspace,
    sub: &Submodule,
    state: &SyncState,
    parent_branch: Option<&str>,
    deep: bool,
) -> Result<SubmoduleRow> {
    let expected = target_branch(sub, parent_branch);
    let clone = ws.clone_repo(&sub.name);
    let exists = clone.exists();

    let mut current_branch = "-".to_string();
    let mut status = SyncStatus::Behind;
    let mut ahead = 0;
    let mut behind = 0;

    if exists {
        if let Ok(branch) = clone.current_branch() {
            current_branch = branch;
        }

        let flat_path = ws.submodule_path(&sub.path);
        let observed = Observation {
            // A deleted flat copy reads as a parent-side change.
            current_hash: if flat_path.exists() {
                hash_tree(&flat_path)?
            } else {
                String::new()
            },
            clone_head: clone.head_commit().unwrap_or_default(),
        };
        status = classify(state.get(&sub.name), &expected, &observed);

        if deep {
            // Remote comparison is best-effort; offline it stays at 0/0.
            clone.fetch_branch(&expected).ok();
            if let Ok(counts) = clone.ahead_behind(&expected) {
                ahead = counts.0;
                behind = counts.1;
            }
            // Remote-only knowledge: unpushed clone commits read as AHEAD,
            // unfetched upstream commits as BEHIND.
            if status == SyncStatus::Synced {
                if ahead > 0 {
                    status = SyncStatus::Ahead;
                } else if behind > 0 {
                    status = SyncStatus::Behind;
                }
            }
        }
    }

    let modified_files = if deep {
        ws.count_parent_modified(&sub.path)
    } else {
        0
    };

    Ok(SubmoduleRow {
        name: sub.name.clone(),
        path: sub.path.clone(),
        current_branch,
        expected_branch: expected,
        status,
        modified_files,
        ahead,
        behind,
        exists,
    })
}

fn render_table(report: &StatusReport, deep: bool, ctx: CommandContext) {
    if !report.parent_branch.is_empty() {
        print_info(&format!("Parent branch: {}", report.parent_branch));
    }
    print_section_header("Submodules");

    let name_w = column_width("NAME", report.submodules.iter().map(|r| r.name.len()));
    let path_w = column_width("PATH", report.submodules.iter().map(|r| r.path.len()));
    let branch_w = column_width(
        "BRANCH",
        report.submodules.iter().map(|r| r.expected_branch.len()),
    );

    let mut header = format!(
        "{:<name_w$}  {:<path_w$}  {:<branch_w$}  {:<8}",
        "NAME", "PATH", "BRANCH", "STATUS"
    );
    if deep {
        header.push_str("  MODIFIED  AHEAD  BEHIND");
    }
    println!("{header}");

    for row in &report.submodules {
        let mut line = format!(
            "{:<name_w$}  {:<path_w$}  {:<branch_w$}  {:<8}",
            row.name,
            row.path,
            row.expected_branch,
            row.status.colored_label()
        );
        if deep {
            line.push_str(&format!(
                "  {:>8}  {:>5}  {:>6}",
                row.modified_files, row.ahead, row.behind
            ));
        }
        println!("{line}");
    }

    if !ctx.quiet {
        for row in &report.submodules {
            if let Some(suggestion) = row.status.suggestion() {
                print_detail(&format!("{}: {suggestion}", row.name));
            }
            if !row.exists {
                print_detail(&format!(
                    "{}: hidden clone missing, run 'salt resolve'",
                    row.name
                ));
            }
        }
    }
}

fn column_width(header: &str, values: impl Iterator<Item = usize>) -> usize {
    values.chain(std::iter::once(header.len())).max().unwrap_or(0)
}
