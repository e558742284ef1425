use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use image::GrayImage;
use kurbo::{Affine, BezPath};
use plotline::{
    ExportConfig, Image, PipelineConfig, PlotCmd, PolishConfig, RasterConfig, RasterMethod,
    RouteBias, RouteConfig, Sheet, SkeletonConfig, SkeletonMethod, Stroke, TraceConfig,
    TracePolicy, close_binary_u8, closing_radius_px, open_binary_u8, run_staged,
    skeleton_topology, skeletonize, to_plot_cmds, travel_length,
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pl_gallery")]
#[command(about = "Run plotline stages on external fixtures and dump their snapshots")]
struct Cli {
    /// Log every stage's diagnostics.
    #[arg(long, global = true)]
    debug: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(name = "morphology")]
    Morphology(MorphologyArgs),
    #[command(name = "skeleton")]
    Skeleton(SkeletonArgs),
    #[command(name = "centerline")]
    Centerline(CenterlineArgs),
}

#[derive(Args, Debug, Clone)]
struct CommonArgs {
    #[arg(long, required = true)]
    input: PathBuf,
    #[arg(long, default_value = "docs/fig/raw")]
    out: PathBuf,
}

#[derive(Args, Debug, Clone)]
struct MorphologyArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long, default_value_t = 0.4)]
    gap_mm: f64,
    #[arg(long, default_value_t = 0.1)]
    pixel_mm: f64,
}

#[derive(Args, Debug, Clone)]
struct SkeletonArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[command(flatten)]
    skel: SkelOpts,
}

#[derive(Args, Debug, Clone)]
struct SkelOpts {
    /// "thinning" or "ridge"
    #[arg(long, default_value = "thinning", value_parser = parse_skeleton_method)]
    method: SkeletonMethod,
    #[arg(long, default_value_t = 300)]
    max_thin_iter: usize,
    #[arg(long)]
    no_extend_tips: bool,
    #[arg(long)]
    no_expand_dots: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum BiasArg {
    /// Prefer strokes further right.
    Lr,
    /// Prefer strokes further down and right.
    Tlbr,
    /// Plain nearest-next ordering.
    None,
}

#[derive(Args, Debug, Clone)]
struct CenterlineArgs {
    // `--input` is a text file holding SVG path data in millimeters.
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long, required = true)]
    width_mm: f64,
    #[arg(long, required = true)]
    height_mm: f64,
    #[arg(long, default_value_t = 0.1)]
    pixel_mm: f64,
    /// Treat the path data as y-down (SVG convention) and flip it onto the sheet.
    #[arg(long)]
    flip_y: bool,
    /// "render" or "contains"
    #[arg(long, default_value = "render", value_parser = parse_raster_method)]
    raster: RasterMethod,
    #[arg(long, default_value_t = 0.0)]
    closing_mm: f64,
    #[command(flatten)]
    skel: SkelOpts,
    /// "segment" or "single-walk"
    #[arg(long, default_value = "segment", value_parser = parse_trace_policy)]
    policy: TracePolicy,
    #[arg(long, default_value_t = 0.8)]
    min_stroke_mm: f64,
    #[arg(long, default_value_t = 2)]
    smooth_iterations: usize,
    #[arg(long, default_value_t = 0.12)]
    simplify_epsilon_mm: f64,
    #[arg(long, value_enum, default_value_t = BiasArg::Lr)]
    bias: BiasArg,
    #[arg(long, default_value_t = 0.0)]
    left_penalty: f64,
    #[arg(long, default_value_t = 0.0)]
    up_penalty: f64,
    #[arg(long)]
    force_ltr: bool,
    #[arg(long, default_value_t = 0.0)]
    stitch_mm: f64,
    #[arg(long, default_value_t = 0.0)]
    bridge_mm: f64,
    #[arg(long, default_value_t = 0.7)]
    poly_step_mm: f64,
}

#[derive(Debug, Clone, Serialize)]
struct MetaMorphology {
    operation: &'static str,
    structuring_element: &'static str,
    gap_mm: f64,
    pixel_mm: f64,
    radius_px: usize,
    pixels_in: usize,
    pixels_open: usize,
    pixels_close: usize,
}

#[derive(Debug, Clone, Serialize)]
struct TopologyDto {
    pixels: usize,
    endpoints: usize,
    junctions: usize,
    isolated: usize,
}

#[derive(Debug, Clone, Serialize)]
struct MetaSkeleton {
    method: &'static str,
    max_thin_iter: usize,
    thin_iterations: usize,
    extend_tips: bool,
    expand_dots: bool,
    topology: TopologyDto,
}

#[derive(Debug, Clone, Serialize)]
struct StrokeDto {
    points: Vec<[f64; 2]>,
    arc_length_mm: f64,
}

#[derive(Debug, Clone, Serialize)]
struct StrokesDto {
    traced: Vec<StrokeDto>,
    polished: Vec<StrokeDto>,
    route: Vec<StrokeDto>,
}

#[derive(Debug, Clone, Serialize)]
struct PlotCmdDto {
    x_mm: f64,
    y_mm: f64,
    pen_down: bool,
    dwell_ms: u16,
}

#[derive(Debug, Clone, Serialize)]
struct MetaCenterline {
    sheet_mm: [f64; 2],
    pixel_mm: f64,
    grid_px: [usize; 2],
    raster: &'static str,
    closing_mm: f64,
    skeleton: MetaSkeleton,
    policy: &'static str,
    traced_strokes: usize,
    route_strokes: usize,
    travel_mm: f64,
    plot_cmds: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match cli.cmd {
        Command::Morphology(args) => run_morphology(args),
        Command::Skeleton(args) => run_skeleton(args),
        Command::Centerline(args) => run_centerline(args),
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_morphology(args: MorphologyArgs) -> Result<()> {
    let case_dir = prepare_case(&args.common, "morphology", "input.png")?;
    let img = load_mask(&args.common.input)?;

    let radius = closing_radius_px(args.gap_mm, args.pixel_mm);
    let opened = open_binary_u8(&img.as_view(), radius);
    let closed = close_binary_u8(&img.as_view(), radius);

    save_mask(case_dir.join("open.png"), &opened)?;
    save_mask(case_dir.join("close.png"), &closed)?;

    write_json(
        case_dir.join("meta.json"),
        &MetaMorphology {
            operation: "open+close",
            structuring_element: "square",
            gap_mm: args.gap_mm,
            pixel_mm: args.pixel_mm,
            radius_px: radius,
            pixels_in: img.as_view().count_set(),
            pixels_open: opened.as_view().count_set(),
            pixels_close: closed.as_view().count_set(),
        },
    )?;

    info!("morphology: radius_px={} -> {}", radius, case_dir.display());
    Ok(())
}

fn run_skeleton(args: SkeletonArgs) -> Result<()> {
    let case_dir = prepare_case(&args.common, "skeleton", "input.png")?;
    let img = load_mask(&args.common.input)?;

    let cfg = skeleton_config(&args.skel);
    let skel = skeletonize(&img.as_view(), &cfg)
        .with_context(|| format!("skeletonizing {}", args.common.input.display()))?;

    save_mask(case_dir.join("skeleton.png"), &skel.mask)?;
    if let Some(dist) = &skel.distance {
        save_distance(case_dir.join("distance.png"), dist)?;
    }

    let meta = skeleton_meta(&cfg, &skel);
    info!(
        "skeleton: pixels={}, endpoints={}, junctions={} -> {}",
        meta.topology.pixels,
        meta.topology.endpoints,
        meta.topology.junctions,
        case_dir.display()
    );
    write_json(case_dir.join("meta.json"), &meta)?;

    Ok(())
}

fn run_centerline(args: CenterlineArgs) -> Result<()> {
    let case_dir = prepare_case(&args.common, "centerline", "outline.txt")?;

    let sheet = Sheet::new(args.width_mm, args.height_mm, args.pixel_mm)
        .context("sheet dimensions must be positive and finite")?;
    let outline = load_outline(&args.common.input, args.flip_y.then_some(args.height_mm))?;

    let cfg = PipelineConfig {
        raster: RasterConfig {
            method: args.raster,
            ..RasterConfig::default()
        },
        closing_mm: args.closing_mm,
        skeleton: skeleton_config(&args.skel),
        trace: TraceConfig {
            policy: args.policy,
            min_stroke_mm: args.min_stroke_mm,
        },
        polish: PolishConfig {
            smooth_iterations: args.smooth_iterations,
            simplify_epsilon_mm: args.simplify_epsilon_mm,
        },
        route: RouteConfig {
            bias: route_bias(args.bias, args.left_penalty, args.up_penalty),
            force_left_to_right: args.force_ltr,
            stitch_mm: args.stitch_mm,
            bridge_mm: args.bridge_mm,
        },
    };

    let staged = run_staged(&outline, &sheet, &cfg)
        .with_context(|| format!("running pipeline on {}", args.common.input.display()))?;

    save_mask(case_dir.join("mask.png"), &staged.mask)?;
    if let Some(closed) = &staged.closed {
        save_mask(case_dir.join("closed.png"), closed)?;
    }
    if let Some(dist) = &staged.skeleton.distance {
        save_distance(case_dir.join("distance.png"), dist)?;
    }
    save_mask(case_dir.join("skeleton.png"), &staged.skeleton.mask)?;

    write_json(
        case_dir.join("strokes.json"),
        &StrokesDto {
            traced: stroke_dtos(&staged.traced),
            polished: stroke_dtos(&staged.polished),
            route: stroke_dtos(&staged.strokes),
        },
    )?;

    let export = ExportConfig {
        poly_step_mm: args.poly_step_mm,
        ..ExportConfig::default()
    };
    let cmds = to_plot_cmds(&staged.strokes, &export);
    write_json(
        case_dir.join("commands.json"),
        &cmds.iter().map(plot_cmd_dto).collect::<Vec<_>>(),
    )?;

    let (w, h) = sheet.grid_size();
    let meta = MetaCenterline {
        sheet_mm: [sheet.width_mm, sheet.height_mm],
        pixel_mm: sheet.pixel_mm,
        grid_px: [w, h],
        raster: raster_method_name(args.raster),
        closing_mm: args.closing_mm,
        skeleton: skeleton_meta(&cfg.skeleton, &staged.skeleton),
        policy: trace_policy_name(args.policy),
        traced_strokes: staged.traced.len(),
        route_strokes: staged.strokes.len(),
        travel_mm: travel_length(&staged.strokes),
        plot_cmds: cmds.len(),
    };
    info!(
        "centerline: strokes={}, travel_mm={:.2}, cmds={} -> {}",
        meta.route_strokes,
        meta.travel_mm,
        meta.plot_cmds,
        case_dir.display()
    );
    write_json(case_dir.join("meta.json"), &meta)?;

    Ok(())
}

fn skeleton_config(opts: &SkelOpts) -> SkeletonConfig {
    SkeletonConfig {
        method: opts.method,
        max_thin_iter: opts.max_thin_iter,
        extend_tips: !opts.no_extend_tips,
        expand_dots: !opts.no_expand_dots,
    }
}

fn skeleton_meta(cfg: &SkeletonConfig, skel: &plotline::Skeleton) -> MetaSkeleton {
    let topo = skeleton_topology(&skel.mask.as_view());
    MetaSkeleton {
        method: skeleton_method_name(cfg.method),
        max_thin_iter: cfg.max_thin_iter,
        thin_iterations: skel.thin_iterations,
        extend_tips: cfg.extend_tips,
        expand_dots: cfg.expand_dots,
        topology: TopologyDto {
            pixels: topo.pixels,
            endpoints: topo.endpoints,
            junctions: topo.junctions,
            isolated: topo.isolated,
        },
    }
}

fn parse_skeleton_method(s: &str) -> Result<SkeletonMethod, String> {
    match s.to_lowercase().as_str() {
        "thinning" => Ok(SkeletonMethod::Thinning),
        "ridge" => Ok(SkeletonMethod::Ridge),
        _ => Err(format!(
            "unknown skeleton method \"{s}\": expected \"thinning\" or \"ridge\""
        )),
    }
}

fn parse_raster_method(s: &str) -> Result<RasterMethod, String> {
    match s.to_lowercase().as_str() {
        "render" => Ok(RasterMethod::Render),
        "contains" => Ok(RasterMethod::Contains),
        _ => Err(format!(
            "unknown raster method \"{s}\": expected \"render\" or \"contains\""
        )),
    }
}

fn parse_trace_policy(s: &str) -> Result<TracePolicy, String> {
    match s.to_lowercase().as_str() {
        "segment" => Ok(TracePolicy::Segment),
        "single-walk" | "single_walk" => Ok(TracePolicy::SingleWalk),
        _ => Err(format!(
            "unknown trace policy \"{s}\": expected \"segment\" or \"single-walk\""
        )),
    }
}

fn route_bias(bias: BiasArg, left_penalty: f64, up_penalty: f64) -> Option<RouteBias> {
    match bias {
        BiasArg::Lr => Some(RouteBias::LeftToRight { left_penalty }),
        BiasArg::Tlbr => Some(RouteBias::TopLeftToBottomRight {
            up_penalty,
            left_penalty,
        }),
        BiasArg::None => None,
    }
}

fn skeleton_method_name(m: SkeletonMethod) -> &'static str {
    match m {
        SkeletonMethod::Thinning => "thinning",
        SkeletonMethod::Ridge => "ridge",
    }
}

fn raster_method_name(m: RasterMethod) -> &'static str {
    match m {
        RasterMethod::Render => "render",
        RasterMethod::Contains => "contains",
    }
}

fn trace_policy_name(p: TracePolicy) -> &'static str {
    match p {
        TracePolicy::Segment => "segment",
        TracePolicy::SingleWalk => "single-walk",
    }
}

fn prepare_case(common: &CommonArgs, case_name: &str, input_copy: &str) -> Result<PathBuf> {
    ensure_file_exists(&common.input, "input")?;

    let case_dir = common.out.join(case_name);
    fs::create_dir_all(&case_dir)
        .with_context(|| format!("creating output directory {}", case_dir.display()))?;

    fs::copy(&common.input, case_dir.join(input_copy)).with_context(|| {
        format!(
            "copying input {} -> {}",
            common.input.display(),
            case_dir.join(input_copy).display()
        )
    })?;

    Ok(case_dir)
}

/// Loads a PNG as a binary mask; a pixel is set iff its luma is `> 0`.
///
/// Image rows run top-down, mask rows bottom-up.
fn load_mask(path: &Path) -> Result<Image<u8>> {
    let dyn_img =
        image::open(path).with_context(|| format!("opening input image {}", path.display()))?;
    let luma = dyn_img.to_luma8();
    let (w, h) = (luma.width() as usize, luma.height() as usize);
    let raw = luma.into_raw();

    let data = flip_rows(&raw, w, h);
    let img = Image::from_vec(w, h, data)
        .with_context(|| format!("constructing mask from {}", path.display()))?;
    Ok(img.as_view().to_binary())
}

fn load_outline(path: &Path, flip_height_mm: Option<f64>) -> Result<BezPath> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading outline {}", path.display()))?;
    let mut outline = BezPath::from_svg(text.trim())
        .with_context(|| format!("parsing SVG path data in {}", path.display()))?;
    if let Some(h) = flip_height_mm {
        outline.apply_affine(Affine::new([1.0, 0.0, 0.0, -1.0, 0.0, h]));
    }
    Ok(outline)
}

fn flip_rows(data: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    for y in (0..height).rev() {
        out.extend_from_slice(&data[y * width..(y + 1) * width]);
    }
    out
}

fn save_mask(path: PathBuf, img: &Image<u8>) -> Result<()> {
    save_luma_raw(
        path,
        img.width(),
        img.height(),
        flip_rows(img.data(), img.width(), img.height()),
    )
}

fn save_distance(path: PathBuf, dist: &Image<u32>) -> Result<()> {
    let max_v = dist.data().iter().copied().max().unwrap_or(0);
    let vis: Vec<u8> = if max_v == 0 {
        vec![0u8; dist.len()]
    } else {
        let scale = 255.0 / max_v as f64;
        dist.data()
            .iter()
            .map(|&v| (v as f64 * scale).round().clamp(0.0, 255.0) as u8)
            .collect()
    };
    save_luma_raw(
        path,
        dist.width(),
        dist.height(),
        flip_rows(&vis, dist.width(), dist.height()),
    )
}

fn save_luma_raw(path: PathBuf, width: usize, height: usize, data: Vec<u8>) -> Result<()> {
    let gray = GrayImage::from_raw(width as u32, height as u32, data)
        .context("constructing GrayImage from raw bytes")?;
    gray.save(&path)
        .with_context(|| format!("saving image {}", path.display()))
}

fn stroke_dtos(strokes: &[Stroke]) -> Vec<StrokeDto> {
    strokes
        .iter()
        .map(|s| StrokeDto {
            points: s.points.iter().map(|p| [p.x, p.y]).collect(),
            arc_length_mm: s.arc_length(),
        })
        .collect()
}

fn plot_cmd_dto(c: &PlotCmd) -> PlotCmdDto {
    PlotCmdDto {
        x_mm: c.x_mm,
        y_mm: c.y_mm,
        pen_down: c.pen_down,
        dwell_ms: c.dwell_ms,
    }
}

fn write_json(path: PathBuf, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(&path, bytes).with_context(|| format!("writing json {}", path.display()))
}

fn ensure_file_exists(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        bail!("{} file does not exist: {}", what, path.display());
    }
    if !path.is_file() {
        bail!("{} path is not a file: {}", what, path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use plotline::RouteBias;

    use super::{BiasArg, Cli, Command, route_bias};

    fn centerline(extra: &[&str]) -> Result<Cli, clap::Error> {
        let mut argv = vec![
            "pl_gallery",
            "centerline",
            "--input",
            "glyph.txt",
            "--width-mm",
            "10",
            "--height-mm",
            "10",
        ];
        argv.extend_from_slice(extra);
        Cli::try_parse_from(argv)
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bias_flag_accepts_known_values_only() {
        let bias_of = |cli: Cli| match cli.cmd {
            Command::Centerline(args) => args.bias,
            other => panic!("unexpected subcommand {other:?}"),
        };

        assert_eq!(bias_of(centerline(&[]).expect("default bias")), BiasArg::Lr);
        assert_eq!(
            bias_of(centerline(&["--bias", "tlbr"]).expect("tlbr")),
            BiasArg::Tlbr
        );
        assert_eq!(
            bias_of(centerline(&["--bias", "none"]).expect("none")),
            BiasArg::None
        );
        assert!(centerline(&["--bias", "diagonal"]).is_err());
    }

    #[test]
    fn bias_maps_to_route_bias() {
        assert_eq!(
            route_bias(BiasArg::Lr, 0.5, 2.0),
            Some(RouteBias::LeftToRight { left_penalty: 0.5 })
        );
        assert_eq!(
            route_bias(BiasArg::Tlbr, 0.5, 2.0),
            Some(RouteBias::TopLeftToBottomRight {
                up_penalty: 2.0,
                left_penalty: 0.5,
            })
        );
        assert_eq!(route_bias(BiasArg::None, 0.5, 2.0), None);
    }
}
