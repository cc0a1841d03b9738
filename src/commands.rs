use std::path::{Path, PathBuf};

use prov_http_cache::{CachedHttpClient, ErrorLog};
use prov_triple_store::{
    TripleStoreBackendType, TripleStoreManager, TripleStoreManagerConfig, dump_dataset,
    load_dataset,
};
use serde_json::{Map, Value};

use crate::{AppError, cli::Command, config::Config, utils::measure_runtime};

/// Run `command` and log how long it took.
pub(crate) async fn execute(command: Command, config: &Config) -> Result<(), AppError> {
    let name = command.name();
    let (result, _elapsed) = measure_runtime(name, dispatch(command, config)).await;
    result
}

async fn dispatch(command: Command, config: &Config) -> Result<(), AppError> {
    match command {
        Command::FetchProv { endpoint, output } => {
            fetch_prov(config, endpoint, &output).await
        }
        Command::FetchJson {
            urls,
            output,
            error_log,
        } => fetch_json(config, urls, output, error_log).await,
        Command::Zip { dir, output } => zip(dir, output).await,
        Command::Minify { files } => minify(files).await,
        Command::Load {
            input,
            output,
            base_iri,
        } => convert(&input, &output, base_iri.as_deref()).await,
        Command::Upload {
            input,
            endpoint,
            store,
            base_iri,
        } => upload(config, &input, endpoint, store.as_deref(), base_iri.as_deref()).await,
    }
}

/// Triple store configuration with an optional endpoint override.
fn triple_store_config(config: &Config, endpoint: Option<String>) -> TripleStoreManagerConfig {
    let mut triple_store = config.triple_store.clone();
    if let Some(endpoint) = endpoint {
        triple_store.backend = TripleStoreBackendType::Sparql;
        triple_store.endpoint = endpoint;
    }
    triple_store
}

async fn fetch_prov(
    config: &Config,
    endpoint: Option<String>,
    output: &Path,
) -> Result<(), AppError> {
    let manager = TripleStoreManager::new(&triple_store_config(config, endpoint))?;
    let quads = manager.fetch_and_store_provenance(output).await?;

    tracing::info!(
        output = %output.display(),
        quads = quads,
        "Provenance stored"
    );
    Ok(())
}

async fn fetch_json(
    config: &Config,
    urls: Vec<String>,
    output: Option<PathBuf>,
    error_log_path: Option<PathBuf>,
) -> Result<(), AppError> {
    let client = CachedHttpClient::connect(&config.http).await?;
    let mut error_log = ErrorLog::new();
    let mut responses = Map::new();

    for url in urls {
        if let Some(body) = client.handle_request(&url, &mut error_log).await {
            responses.insert(url, body);
        }
    }

    let fetched = responses.len();
    let responses = Value::Object(responses);
    match output {
        Some(path) => write_json(responses, path).await?,
        None => println!("{}", serde_json::to_string_pretty(&responses)?),
    }

    if let Some(path) = error_log_path {
        write_json(serde_json::to_value(&error_log)?, path).await?;
    }

    if error_log.is_empty() {
        tracing::info!(fetched = fetched, "All requests succeeded");
    } else {
        tracing::warn!(
            fetched = fetched,
            failed = error_log.len(),
            "Some requests failed"
        );
    }
    Ok(())
}

async fn write_json(value: Value, path: PathBuf) -> Result<(), AppError> {
    tokio::task::spawn_blocking(move || prov_files::dump_json(&value, &path)).await??;
    Ok(())
}

async fn zip(dir: PathBuf, output: PathBuf) -> Result<(), AppError> {
    tokio::task::spawn_blocking(move || prov_files::zip_dir(&dir, &output)).await??;
    Ok(())
}

async fn minify(files: Vec<PathBuf>) -> Result<(), AppError> {
    tokio::task::spawn_blocking(move || {
        for file in &files {
            let target = prov_files::minify_json(file)?;
            tracing::info!(
                source = %file.display(),
                target = %target.display(),
                "Minified JSON file"
            );
        }
        Ok::<_, prov_files::FilesError>(())
    })
    .await??;
    Ok(())
}

async fn convert(input: &Path, output: &Path, base_iri: Option<&str>) -> Result<(), AppError> {
    let dataset = load_dataset(input, base_iri).await?;
    dump_dataset(&dataset, output).await?;
    Ok(())
}

async fn upload(
    config: &Config,
    input: &Path,
    endpoint: Option<String>,
    store: Option<&Path>,
    base_iri: Option<&str>,
) -> Result<(), AppError> {
    let dataset = load_dataset(input, base_iri).await?;
    let manager = TripleStoreManager::new(&triple_store_config(config, endpoint))?;

    let quads = match store {
        Some(path) => manager.upload_and_store_dataset(&dataset, path).await?,
        None => manager.upload_dataset(&dataset).await?,
    };

    tracing::info!(
        input = %input.display(),
        backend = %manager.backend_name(),
        quads = quads,
        "Dataset uploaded"
    );
    Ok(())
}
