use candela::engine::app::{AppConfig, Application};
use candela::engine::scene::Scene;
use candela::engine::timestep::TimeStep;
use candela_asset::Environment;
use tracing::info;
use tracing_subscriber::EnvFilter;

struct SandboxScene {
    environment: Environment,
    spin: f32,
}

impl SandboxScene {
    fn new(environment: Environment) -> Self {
        Self {
            environment,
            spin: 0.0,
        }
    }
}

impl Scene for SandboxScene {
    fn name(&self) -> &str {
        "sandbox"
    }

    fn on_update(&mut self, ts: &TimeStep) {
        self.spin = (self.spin + 45.0 * ts.seconds()) % 360.0;
    }

    fn on_tick(&mut self) {
        info!("Sandbox spinning at {:.1} degrees", self.spin);
    }

    fn environment(&self) -> Option<&Environment> {
        Some(&self.environment)
    }

    fn environment_mut(&mut self) -> Option<&mut Environment> {
        Some(&mut self.environment)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // optional: path to a cube-map source (per-face or equirect), no extension
    let environment = match std::env::args().nth(1) {
        Some(path) => Environment::open(&path, true, true),
        None => Environment::default(),
    };

    let mut app = Application::new(
        AppConfig::builder()
            .title("Candela Sandbox")
            .width(1280)
            .height(720)
            .build(),
    );
    app.enqueue_scene(Box::new(SandboxScene::new(environment)));

    std::process::exit(app.run());
}
