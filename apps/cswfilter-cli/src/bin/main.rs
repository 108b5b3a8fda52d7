use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde_json::json;
use tracing_subscriber::EnvFilter;
use url::{form_urlencoded, Url};

use cswfilter_core::config::{resolve_with_base, Config};
use cswfilter_core::types::{FormValues, PageRequest, RegistryEntry, SERVICE_ID_FIELD};
use cswfilter_store::to_url;
use cswfilter_tasks::{submit, RequiredFieldsForm, TaskBuilder};

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().collect();
    let prog = args.remove(0);
    (prog, args)
}

fn input_path(cwd: &Path, arg: Option<&String>, config: &Config, key: &str) -> Option<PathBuf> {
    match arg {
        Some(p) => Some(resolve_with_base(cwd, p)),
        None => config.get::<String>(key).ok().map(|p| resolve_with_base(cwd, p)),
    }
}

fn render_request(base: Option<&Url>, request: &PageRequest) -> anyhow::Result<String> {
    if let Some(base) = base {
        return Ok(to_url(base, request)?.to_string());
    }
    let query = form_urlencoded::Serializer::new(String::new()).extend_pairs(request.query_pairs()).finish();
    Ok(format!("{}?{}", request.endpoint, query))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let settings = config.filter_settings()?;
    let (prog, args) = parse_args();
    let cwd = env::current_dir()?;

    let (Some(form_path), Some(registry_path)) = (
        input_path(&cwd, args.first(), &config, "input.form"),
        input_path(&cwd, args.get(1), &config, "input.registry"),
    ) else {
        eprintln!("Usage: {} <form.json> <registry.json>", prog);
        std::process::exit(1);
    };

    let values: FormValues = serde_json::from_str(
        &fs::read_to_string(&form_path).with_context(|| format!("reading {}", form_path.display()))?,
    )
    .with_context(|| format!("parsing form values in {}", form_path.display()))?;
    let registry: Vec<RegistryEntry> = serde_json::from_str(
        &fs::read_to_string(&registry_path).with_context(|| format!("reading {}", registry_path.display()))?,
    )
    .with_context(|| format!("parsing registry entries in {}", registry_path.display()))?;

    let base = settings.base_url.as_deref().map(Url::parse).transpose().context("filter.base_url")?;
    let builder = TaskBuilder::from_settings(&settings);
    let form = RequiredFieldsForm::new(values).require_present(SERVICE_ID_FIELD);

    let tasks = match submit(&form, &registry, &builder) {
        Ok(tasks) => tasks,
        Err(e) => { tracing::error!(error = %e, "search not started"); std::process::exit(1); }
    };
    if tasks.is_empty() {
        tracing::warn!("no services selected");
    }

    for task in &tasks {
        let first_page = render_request(base.as_ref(), &task.data_source.request_for(1)?)?;
        let line = json!({
            "title": task.title,
            "names": task.parameters.names(),
            "values": task.parameters.values(),
            "pageSize": task.page_size,
            "firstPage": first_page,
        });
        println!("{}", line);
    }
    Ok(())
}
