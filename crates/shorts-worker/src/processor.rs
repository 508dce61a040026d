//! Job processing logic.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info, Instrument};

use shorts_footage::FootageSelector;
use shorts_media::{
    build_captions, AudioTranscoder, SpeechSynthesizer, TempFiles, Transcriber, VideoRenderer,
};
use shorts_models::{Composition, Job, Scene, SceneAudio, SceneInput};
use shorts_storage::VideoStore;

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::logging::JobLogger;
use crate::music::MusicSelector;

/// Media engines the pipeline drives.
#[derive(Clone)]
pub struct Engines {
    pub speech: Arc<dyn SpeechSynthesizer>,
    pub transcoder: Arc<dyn AudioTranscoder>,
    pub transcriber: Arc<dyn Transcriber>,
    pub renderer: Arc<dyn VideoRenderer>,
}

/// Context for job processing.
pub struct ProcessingContext {
    pub config: WorkerConfig,
    pub engines: Engines,
    pub footage: FootageSelector,
    pub music: MusicSelector,
    pub store: VideoStore,
}

impl ProcessingContext {
    pub fn new(
        config: WorkerConfig,
        engines: Engines,
        footage: FootageSelector,
        music: MusicSelector,
    ) -> Self {
        let store = VideoStore::new(config.videos_dir.clone());
        Self {
            config,
            engines,
            footage,
            music,
            store,
        }
    }

    /// Random source for one job: seeded when a seed is configured.
    pub fn job_rng(&self) -> StdRng {
        match self.config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

/// Running state of a job across its scenes.
struct SceneAccumulator {
    scenes: Vec<Scene>,
    total_seconds: f64,
    used_footage: HashSet<String>,
}

/// Render one job into the video store and return the video path.
///
/// Temporary audio is removed on every exit path.
pub async fn process_job(ctx: &ProcessingContext, job: &Job) -> WorkerResult<PathBuf> {
    let logger = JobLogger::new(&job.id, "create_short");
    let span = logger.create_span();

    async {
        logger.log_start(&format!("{} scenes", job.scene_count()));

        let mut temp = TempFiles::create(&ctx.config.temp_dir, job.id.as_str()).await?;
        let result = render_job(ctx, job, &mut temp, &logger).await;
        temp.cleanup().await;

        match &result {
            Ok(path) => logger.log_completion(&format!("video at {}", path.display())),
            Err(e) => logger.log_error(&e.to_string()),
        }
        result
    }
    .instrument(span)
    .await
}

async fn render_job(
    ctx: &ProcessingContext,
    job: &Job,
    temp: &mut TempFiles,
    logger: &JobLogger,
) -> WorkerResult<PathBuf> {
    let mut rng = ctx.job_rng();
    let padding_seconds = job.config.padding_back_seconds();
    let last_index = job.scenes.len().saturating_sub(1);

    let mut acc = SceneAccumulator {
        scenes: Vec::with_capacity(job.scenes.len()),
        total_seconds: 0.0,
        used_footage: HashSet::new(),
    };

    for (index, input) in job.scenes.iter().enumerate() {
        let padding = if index == last_index { padding_seconds } else { 0.0 };
        let scene = process_scene(ctx, job, input, padding, temp, &mut acc, &mut rng)
            .await
            .map_err(|e| {
                error!(job_id = %job.id, scene = index, "Scene failed: {}", e);
                WorkerError::scene_failed(index, e)
            })?;

        acc.total_seconds += scene.audio.duration_seconds;
        acc.scenes.push(scene);
        logger.log_progress(&format!("scene {}/{} ready", index + 1, job.scenes.len()));
    }

    if job.config.padding_back_ms.is_some() {
        acc.total_seconds += padding_seconds;
    }

    let music = ctx.music.select(acc.total_seconds, job.config.music, &mut rng)?;
    let composition = Composition {
        music,
        scenes: acc.scenes,
        duration_ms: (acc.total_seconds * 1000.0).round() as u64,
        padding_back_ms: job.config.padding_back_ms,
    };

    let output_path = ctx.store.video_path(&job.id);
    info!(
        job_id = %job.id,
        duration_ms = composition.duration_ms,
        music = %composition.music.file,
        "Rendering video"
    );

    if let Err(e) = ctx
        .engines
        .renderer
        .render(&composition, &job.id, &output_path)
        .await
    {
        ctx.store.delete(&job.id).await.ok();
        return Err(e.into());
    }

    Ok(output_path)
}

async fn process_scene(
    ctx: &ProcessingContext,
    job: &Job,
    input: &SceneInput,
    padding_seconds: f64,
    temp: &mut TempFiles,
    acc: &mut SceneAccumulator,
    rng: &mut StdRng,
) -> WorkerResult<Scene> {
    let engines = &ctx.engines;

    let speech = engines.speech.generate(&input.text, &ctx.config.voice).await?;
    let spoken_seconds = speech.duration_seconds;

    let stem = uuid::Uuid::new_v4().simple().to_string();
    let wav_path = temp.allocate(&format!("{stem}.wav"));
    let mp3_name = format!("{stem}.mp3");
    let mp3_path = temp.allocate(&mp3_name);

    engines.transcoder.normalize(&speech, &wav_path).await?;
    let records = engines.transcriber.transcribe(&wav_path).await?;
    let captions = build_captions(&records);

    engines.transcoder.encode(&speech, &mp3_path).await?;
    let audio_url = ctx.config.temp_audio_url(job.id.as_str(), &mp3_name);

    let footage = ctx
        .footage
        .find_video(&input.search_terms, spoken_seconds, &acc.used_footage, rng)
        .await?;
    acc.used_footage.insert(footage.id.clone());

    Ok(Scene {
        captions,
        video: footage.url,
        audio: SceneAudio {
            url: audio_url,
            duration_seconds: spoken_seconds + padding_seconds,
        },
    })
}
