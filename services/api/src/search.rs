use buildsite::cms::SanityClient;
use buildsite::config::AppConfig;
use buildsite::content::{ContentService, Locale, SearchHit};
use buildsite::error::AppError;
use buildsite::telemetry;
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct SearchArgs {
    /// Text to look for in titles and descriptions
    pub(crate) term: String,
    /// Site language used for titles and links (en or de)
    #[arg(long, default_value = "en")]
    pub(crate) locale: Locale,
    /// Print the raw JSON payload instead of a listing
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) async fn run_search(args: SearchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let client = SanityClient::from_config(&config.cms)?;
    let service = ContentService::new(Arc::new(client));
    let hits = service.search(&args.term, args.locale).await?;

    if args.json {
        let payload = serde_json::json!({ "results": hits });
        println!("{payload:#}");
    } else {
        print!("{}", render_hits(&args.term, &hits));
    }
    Ok(())
}

fn render_hits(term: &str, hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return format!("No results for '{}'.\n", term.trim());
    }

    let mut output = format!("{} result(s) for '{}':\n", hits.len(), term.trim());
    for hit in hits {
        output.push_str(&format!(
            "- [{}] {} ({})\n",
            hit.kind.document_type(),
            hit.title,
            hit.href
        ));
        if let Some(description) = &hit.description {
            output.push_str(&format!("    {description}\n"));
        }
    }
    output
}
