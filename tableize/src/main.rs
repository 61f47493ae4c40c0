use clap::Parser;
use log::info;
use std::fs;
use std::path::PathBuf;
use std::process;
use tableize_lib::style::stylesheet::StyleSheet;
use tableize_lib::{tableize, InlineOptions};

#[derive(Parser)]
#[command(name = "tableize")]
#[command(about = "Inline CSS into HTML email markup")]
struct Args {
    /// Input HTML file.
    input: PathBuf,

    /// Output file. Defaults to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Extra stylesheet applied before the document's own <style> elements.
    /// May be given more than once.
    #[arg(long = "css", value_name = "FILE")]
    css: Vec<PathBuf>,

    /// Leave class attributes in place after inlining.
    #[arg(long)]
    keep_classes: bool,

    /// Leave <style> elements in the document head.
    #[arg(long)]
    keep_style_elements: bool,
}

fn run(args: &Args) -> tableize_lib::Result<()> {
    let html_content = fs::read_to_string(&args.input)?;

    let mut extra_css = String::new();
    for path in &args.css {
        let sheet = StyleSheet::from_file(path)?;
        extra_css.push_str(&sheet.source_text);
        extra_css.push('\n');
    }

    let mut options = InlineOptions::new()
        .with_remove_class_attributes(!args.keep_classes)
        .with_remove_style_elements(!args.keep_style_elements);
    if !extra_css.is_empty() {
        options = options.with_extra_css(extra_css);
    }

    let html = tableize::inline_html_with_options(&html_content, &options)?.to_html();
    match &args.output {
        Some(path) => {
            fs::write(path, html)?;
            info!("wrote {}", path.display());
        }
        None => println!("{}", html),
    }
    Ok(())
}

fn main() {
    env_logger::init();

    // parse the args given in terminal
    let args: Args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error inlining {}: {}", args.input.display(), e);
        process::exit(1);
    }
}
