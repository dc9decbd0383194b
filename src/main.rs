use anyhow::{Context, bail};
use clap::{Parser, Subcommand};

mod model;
mod payload;
mod prompt;
mod render;
mod spec;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "hw-diagrammer")]
#[command(about = "Hardware block diagram pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the requirements-analysis prompt for the language model.
    Prompt {
        #[arg(long)]
        input: String,

        #[arg(short = 'o', long)]
        out: Option<String>,
    },

    /// Generate a block diagram + ASCII summary from parsed requirements.
    Diagram {
        #[arg(long)]
        input: String,

        #[arg(short = 'o', long)]
        out: Option<String>,
    },

    /// Render a block diagram as Mermaid plus an HTML approval page.
    Render {
        #[arg(long)]
        input: String,

        /// Where to write the approval page.
        #[arg(long)]
        html: String,

        #[arg(short = 'o', long)]
        out: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Prompt { input, out } => {
            let mut payload = payload::read_payload(&input)?;

            let requirements = match payload::str_field(&payload, "requirements") {
                Some(r) => r.to_string(),
                None => bail!("payload has no 'requirements' text to analyze"),
            };
            let system_type = payload::system_type(&payload).to_string();

            let ai_prompt = prompt::build_prompt(&requirements, &system_type);

            payload.insert("ai_prompt".into(), ai_prompt.into());
            payload.insert("task_complexity".into(), prompt::TASK_COMPLEXITY.into());
            payload.insert("max_tokens".into(), prompt::MAX_RESPONSE_TOKENS.into());

            payload::write_payload(&payload, out.as_deref())?;
        }

        Commands::Diagram { input, out } => {
            let mut payload = payload::read_payload(&input)?;

            // 1) Deserialize parsed_requirements (everything optional; missing
            //    sections fall back to defaults downstream).
            let parsed: spec::ParsedRequirements = match payload.get("parsed_requirements") {
                Some(v) => serde_json::from_value(v.clone())
                    .context("parsed_requirements does not match the expected shape")?,
                None => spec::ParsedRequirements::default(),
            };

            let project = payload::project_name(&payload).to_string();
            let system_type = payload::system_type(&payload).to_string();

            // 2) Build the diagram, stats, and text summary.
            let diagram = model::build_diagram(&parsed, &project, &system_type, chrono::Utc::now());
            let stats = model::DiagramStats::for_diagram(&diagram);
            let ascii = render::ascii_summary(&diagram, &parsed);

            payload.insert("block_diagram".into(), serde_json::to_value(&diagram)?);
            payload.insert("ascii_diagram".into(), ascii.into());
            payload.insert("awaiting_approval".into(), true.into());
            payload.insert("diagram_stats".into(), serde_json::to_value(&stats)?);

            payload::write_payload(&payload, out.as_deref())?;
        }

        Commands::Render { input, html, out } => {
            let mut payload = payload::read_payload(&input)?;

            let diagram: model::Diagram = match payload.get("block_diagram") {
                Some(v) => serde_json::from_value(v.clone())
                    .context("block_diagram does not match the expected shape")?,
                None => bail!("payload has no block_diagram; run the diagram stage first"),
            };

            let project = payload::project_name(&payload).to_string();
            let system_type = payload::system_type(&payload).to_string();

            let mermaid = render::mermaid_flowchart(&diagram);
            let image_url = render::mermaid_image_url(&mermaid);
            let page = render::render_approval_page(
                &diagram,
                &mermaid,
                &project,
                &system_type,
                chrono::Utc::now(),
            );

            std::fs::write(&html, page).with_context(|| format!("write approval page {}", html))?;

            // Downstream nodes get an absolute path + file URL to the page.
            let abs = std::fs::canonicalize(&html)
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| html.clone());

            payload.insert("mermaid_code".into(), mermaid.into());
            payload.insert("diagram_image_url".into(), image_url.into());
            payload.insert("diagram_html_path".into(), abs.clone().into());
            payload.insert("diagram_html_url".into(), format!("file://{}", abs).into());
            payload.insert("visual_preview_ready".into(), true.into());

            payload::write_payload(&payload, out.as_deref())?;
            println!("Wrote {}", html);
        }
    }

    Ok(())
}
