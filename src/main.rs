#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::process::ExitCode;

    use clap::Parser;
    use playdeck::hosts::Clocked;
    use playdeck::hosts::egui_host::PlayerPanel;
    use playdeck::hosts::retained::RetainedPage;
    use playdeck::hosts::simulated::SimulatedVideo;
    use playdeck::{PlayerError, Settings, SettingsOverrides};

    /// Mount points the demo page offers.
    const MOUNTS: [&str; 2] = ["body", ".myplayer"];

    /// Parsed command line arguments.
    #[derive(Parser, Debug, Clone)]
    #[command(about = "Plays a video with playdeck controls in a native window.")]
    pub struct Args {
        /// Address of the video to play.
        #[arg(long)]
        pub source: Option<String>,

        /// Mount point to insert the player into ("body" or ".myplayer").
        #[arg(long)]
        pub container: Option<String>,

        /// JSON file with player settings, using the browser option names.
        #[arg(long)]
        pub config: Option<PathBuf>,

        #[arg(long)]
        pub volume: Option<f64>,

        #[arg(long)]
        pub rate: Option<f64>,

        /// Seconds to jump on a forward skip.
        #[arg(long, allow_hyphen_values = true)]
        pub skip_next: Option<f64>,

        /// Seconds to jump on a backward skip, usually negative.
        #[arg(long, allow_hyphen_values = true)]
        pub skip_prev: Option<f64>,

        /// Length of the simulated video in seconds. Zero simulates media
        /// whose length never loads.
        #[arg(long, default_value_t = 60.0)]
        pub duration: f64,

        /// Play through GStreamer instead of the simulated surface.
        #[cfg(feature = "gstreamer")]
        #[arg(long)]
        pub gstreamer: bool,
    }

    impl Args {
        fn overrides(&self) -> SettingsOverrides {
            SettingsOverrides {
                source: self.source.clone(),
                container: self.container.clone(),
                volume: self.volume,
                playback_rate: self.rate,
                skip_next: self.skip_next,
                skip_prev: self.skip_prev,
            }
        }

        /// Defaults, then the config file, then command line flags.
        fn settings(&self) -> Result<Settings, PlayerError> {
            let file = match &self.config {
                Some(path) => SettingsOverrides::from_path(path)?,
                None => SettingsOverrides::default(),
            };
            Ok(Settings::with_overrides(file.then(self.overrides())))
        }
    }

    fn page<S: Clocked + Clone + 'static>(loader: impl Fn(&str) -> S + 'static) -> RetainedPage<S> {
        let mut page = RetainedPage::new(loader);
        for mount in MOUNTS {
            page.add_mount(mount);
        }
        page
    }

    fn run<S: Clocked + Clone + 'static>(page: RetainedPage<S>, settings: Settings) -> ExitCode {
        let panel = match PlayerPanel::mount(page, settings) {
            Ok(panel) => panel,
            // Already reported by the widget.
            Err(_) => return ExitCode::FAILURE,
        };
        let result = eframe::run_native(
            "playdeck",
            eframe::NativeOptions::default(),
            Box::new(|_cc| Ok(Box::new(panel))),
        );
        match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                tracing::error!("Window closed with an error: {err}");
                ExitCode::FAILURE
            }
        }
    }

    pub fn main() -> ExitCode {
        tracing_subscriber::fmt::init();
        let args = Args::parse();
        let settings = match args.settings() {
            Ok(settings) => settings,
            Err(err) => {
                tracing::error!("{err}");
                return ExitCode::FAILURE;
            }
        };
        tracing::debug!("Starting with {settings:?}");

        #[cfg(feature = "gstreamer")]
        if args.gstreamer {
            use playdeck::hosts::gst_surface::GstVideo;
            if settings.source.is_empty() {
                tracing::error!("{}", PlayerError::MissingSource);
                return ExitCode::FAILURE;
            }
            let video = match GstVideo::open(&settings.source) {
                Ok(video) => video,
                Err(err) => {
                    tracing::error!("{err}");
                    return ExitCode::FAILURE;
                }
            };
            return run(page(move |_| video.clone()), settings);
        }

        let duration = (args.duration > 0.0).then_some(args.duration);
        run(
            page(move |source| SimulatedVideo::with_source(source, duration)),
            settings,
        )
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    native::main()
}

#[cfg(target_arch = "wasm32")]
fn main() {}
