use civgen::{
    CivilizationExport, TracingReporter, WorldCivParams, generate_civilization, generate_world,
};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Генератор цивилизации для Chronicles of Realms: столицы, дороги, территории
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу в формате TOML (без него — значения по умолчанию)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Путь для сохранения результата (по умолчанию: ./civilization.json)
    #[arg(short, long, default_value = "civilization.json")]
    output: PathBuf,

    /// Переопределяет сид из конфигурации
    #[arg(short, long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("civgen=info,civgen_cli=info")),
        )
        .init();

    let cli = Cli::parse();

    println!("🔍 Загрузка конфигурации...");
    let mut params = match &cli.config {
        Some(path) => WorldCivParams::from_toml_file(path)?,
        None => WorldCivParams::default(),
    };
    if let Some(seed) = cli.seed {
        params.seed = seed;
    }

    println!(
        "Генерация ландшафта (размер: {}×{}, сид {})...",
        params.width, params.height, params.seed
    );
    let mut grid = generate_world(&params)?;

    println!("Вывод цивилизации...");
    let civilization = generate_civilization(&mut grid, &params.civilization, &TracingReporter)?;

    println!("Сохранение в {:?}", cli.output);
    CivilizationExport::new(&grid, &civilization).save_json(&cli.output)?;

    println!(
        "\nГотово! Наций: {}, дорог: {}, морских путей: {}.",
        civilization.capitals.len(),
        civilization.roads.len(),
        civilization.sea_routes
    );
    Ok(())
}
