//! PanelCAD 命令行入口
//!
//! 从 JSON 面板清单（或内置示例布局）生成 DXF 图纸。
//!
//! 用法：
//! ```text
//! panelcad [layout.json] [选项]
//!   -o, --output <文件名>     输出文件名（默认 panel_export.dxf）
//!   -d, --dir <目录>          输出目录（默认当前目录）
//!       --layer <名称>        图层名（默认 PANELS）
//!       --precision <位数>    坐标精度（默认 4）
//!       --no-labels           不输出标签文字
//! ```

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use panelcad_core::panel::Panel;
use panelcad_file::export::{export, ExportRequest};

/// 命令行参数
struct CliArgs {
    layout_path: Option<PathBuf>,
    output: Option<String>,
    dir: PathBuf,
    layer: Option<String>,
    precision: Option<u32>,
    labels: bool,
}

impl CliArgs {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut parsed = Self {
            layout_path: None,
            output: None,
            dir: PathBuf::from("."),
            layer: None,
            precision: None,
            labels: true,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-o" | "--output" => {
                    parsed.output = Some(args.next().context("--output requires a value")?);
                }
                "-d" | "--dir" => {
                    parsed.dir = PathBuf::from(args.next().context("--dir requires a value")?);
                }
                "--layer" => {
                    parsed.layer = Some(args.next().context("--layer requires a value")?);
                }
                "--precision" => {
                    let value = args.next().context("--precision requires a value")?;
                    parsed.precision =
                        Some(value.parse().context("--precision must be an integer")?);
                }
                "--no-labels" => parsed.labels = false,
                other if other.starts_with('-') => bail!("unknown option: {other}"),
                other => {
                    if parsed.layout_path.is_some() {
                        bail!("only one layout file can be given");
                    }
                    parsed.layout_path = Some(PathBuf::from(other));
                }
            }
        }
        Ok(parsed)
    }
}

/// 读取 JSON 面板清单
fn load_layout(path: &PathBuf) -> Result<Vec<Panel>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let panels: Vec<Panel> = serde_json::from_str(&text)
        .with_context(|| format!("invalid layout file {}", path.display()))?;
    Ok(panels)
}

fn main() -> Result<()> {
    // 初始化日志
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder().with_max_level(Level::INFO).finish(),
    )?;

    let args = CliArgs::parse(std::env::args().skip(1))?;

    let panels = match &args.layout_path {
        Some(path) => {
            let panels = load_layout(path)?;
            info!(count = panels.len(), path = %path.display(), "loaded layout");
            panels
        }
        None => {
            info!("no layout file given, using built-in demo layout");
            Panel::demo_layout()
        }
    };

    let mut request = ExportRequest::panels(panels).with_labels(args.labels);
    if let Some(output) = args.output {
        request = request.with_filename(output);
    }
    if let Some(layer) = args.layer {
        request = request.with_layer_name(layer);
    }
    if let Some(precision) = args.precision {
        request = request.with_precision(precision);
    }

    let output = export(&request)?;
    let path = output.save(&args.dir)?;
    info!(path = %path.display(), bytes = output.content.len(), "wrote drawing");

    Ok(())
}
