use argh::FromArgs;
use std::sync::LazyLock;

fn window_size(size: &str) -> Result<Option<(u32, u32)>, String> {
    let sep = if size.contains('x') { 'x' } else { ',' };

    let mut split = size.split(sep);
    let w: Option<u32> = split.next().and_then(|w| w.parse().ok());
    let h: Option<u32> = split.next().and_then(|h| h.parse().ok());

    let size = match (w, h) {
        (Some(w), Some(h)) => (w, h),
        (Some(w), _) => (w, w),
        _ => return Ok(None),
    };

    Ok(Some(size))
}

/// Engine arguments
#[derive(Default, FromArgs)]
pub struct EngineArgs {
    #[argh(switch, hidden_help)]
    pub fullscreen: bool,
    #[argh(switch, hidden_help)]
    pub no_vsync: bool,

    #[argh(option, hidden_help)]
    pub target_fps: Option<f32>,
    #[argh(option, hidden_help)]
    pub physics_timestep: Option<f64>,

    #[argh(option, hidden_help, from_str_fn(window_size))]
    pub window_size: Option<Option<(u32, u32)>>,
}

impl EngineArgs {
    fn init() -> Option<EngineArgs> {
        let mut args = std::env::args();
        let cmd_name = args.next()?;
        let args: Vec<String> = args.collect();
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        EngineArgs::from_args(&[&cmd_name], &args).ok()
    }

    pub fn get() -> &'static EngineArgs {
        static INSTANCE: LazyLock<EngineArgs> =
            LazyLock::new(|| EngineArgs::init().unwrap_or_default());
        &INSTANCE
    }

    pub fn default_window_size() -> (u32, u32) {
        EngineArgs::get().window_size.flatten().unwrap_or((800, 600))
    }
}
