//! End-to-end tests of the short creator with in-memory engines.

use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::sync::Semaphore;

use shorts_footage::{
    FootageProvider, FootageResult, FootageSelector, ProviderVideo, SelectorConfig, VideoFile,
};
use shorts_media::{
    AudioTranscoder, MediaError, MediaResult, SpeechAudio, SpeechSynthesizer, Transcriber,
    VideoRenderer,
};
use shorts_models::{
    Composition, JobId, JobState, Music, MusicMood, RenderConfig, SceneInput, TranscriptionRecord,
    TranscriptionToken, VideoStatus,
};
use shorts_worker::{
    Engines, MusicSelector, ProcessingContext, ShortCreator, WorkerConfig, WorkerError,
};

// Fakes

/// Every utterance lasts four seconds.
struct FakeSpeech;

#[async_trait]
impl SpeechSynthesizer for FakeSpeech {
    async fn generate(&self, text: &str, _voice: &str) -> MediaResult<SpeechAudio> {
        match text {
            "fail" => Err(MediaError::synthesis_failed("voice model unavailable")),
            "panic" => panic!("speech engine crashed"),
            _ => Ok(SpeechAudio::new(text.as_bytes().to_vec(), 4.0)),
        }
    }
}

struct FakeTranscoder;

#[async_trait]
impl AudioTranscoder for FakeTranscoder {
    async fn normalize(&self, audio: &SpeechAudio, dest: &Path) -> MediaResult<()> {
        tokio::fs::write(dest, &audio.data).await?;
        Ok(())
    }

    async fn encode(&self, audio: &SpeechAudio, dest: &Path) -> MediaResult<()> {
        tokio::fs::write(dest, &audio.data).await?;
        Ok(())
    }
}

/// Transcribes a file back into one token per word.
struct FakeTranscriber;

#[async_trait]
impl Transcriber for FakeTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> MediaResult<Vec<TranscriptionRecord>> {
        let text = String::from_utf8(tokio::fs::read(audio_path).await?).unwrap();
        let tokens = text
            .split_whitespace()
            .enumerate()
            .map(|(i, word)| {
                let from = i as i64 * 300;
                TranscriptionToken::new(format!(" {word}"), from, from + 300)
            })
            .collect();

        Ok(vec![TranscriptionRecord {
            text: text.clone(),
            offsets: Default::default(),
            tokens,
        }])
    }
}

#[derive(Default)]
struct FakeRenderer {
    gate: Option<Arc<Semaphore>>,
    fail: bool,
    renders: Mutex<Vec<(JobId, Composition)>>,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl FakeRenderer {
    fn gated(gate: Arc<Semaphore>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    fn renders(&self) -> Vec<(JobId, Composition)> {
        self.renders.lock().unwrap().clone()
    }

    fn composition(&self, id: &JobId) -> Composition {
        self.renders()
            .into_iter()
            .find(|(job, _)| job == id)
            .map(|(_, composition)| composition)
            .expect("job was not rendered")
    }
}

#[async_trait]
impl VideoRenderer for FakeRenderer {
    async fn render(
        &self,
        composition: &Composition,
        job_id: &JobId,
        output_path: &Path,
    ) -> MediaResult<()> {
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active, Ordering::SeqCst);
        self.renders
            .lock()
            .unwrap()
            .push((job_id.clone(), composition.clone()));

        if let Some(gate) = &self.gate {
            let _permit = gate.acquire().await.unwrap();
        }

        let result = if self.fail {
            Err(MediaError::render_failed("encoder crashed"))
        } else {
            tokio::fs::write(output_path, b"mp4").await.map_err(Into::into)
        };

        self.active.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

enum FootageMode {
    /// Every search returns fresh qualifying clips
    Unique,
    /// Every search returns the same clips
    Fixed(Vec<ProviderVideo>),
    /// No search returns anything
    Empty,
}

struct FakeFootage {
    mode: FootageMode,
    next_id: AtomicUsize,
    searches: AtomicUsize,
}

impl FakeFootage {
    fn new(mode: FootageMode) -> Self {
        Self {
            mode,
            next_id: AtomicUsize::new(0),
            searches: AtomicUsize::new(0),
        }
    }
}

fn clip(id: &str, duration_seconds: f64) -> ProviderVideo {
    ProviderVideo {
        id: id.to_string(),
        duration_seconds,
        frame_rate: Some(30.0),
        files: vec![VideoFile {
            quality: Some("hd".into()),
            width: 1080,
            height: 1920,
            link: format!("https://footage.test/{id}.mp4"),
        }],
    }
}

#[async_trait]
impl FootageProvider for FakeFootage {
    async fn search(&self, _term: &str) -> FootageResult<Vec<ProviderVideo>> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        match &self.mode {
            FootageMode::Unique => Ok((0..3)
                .map(|_| {
                    let n = self.next_id.fetch_add(1, Ordering::SeqCst);
                    clip(&format!("clip-{n}"), 30.0)
                })
                .collect()),
            FootageMode::Fixed(videos) => Ok(videos.clone()),
            FootageMode::Empty => Ok(Vec::new()),
        }
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

// Harness

struct Harness {
    creator: ShortCreator,
    renderer: Arc<FakeRenderer>,
    footage: Arc<FakeFootage>,
    dir: TempDir,
}

impl Harness {
    async fn start(footage: FakeFootage, renderer: FakeRenderer) -> Self {
        let dir = TempDir::new().unwrap();
        let config = WorkerConfig {
            temp_dir: dir.path().join("temp"),
            videos_dir: dir.path().join("videos"),
            rng_seed: Some(42),
            shutdown_timeout: Duration::from_secs(5),
            ..WorkerConfig::default()
        };

        let renderer = Arc::new(renderer);
        let footage = Arc::new(footage);
        let engines = Engines {
            speech: Arc::new(FakeSpeech),
            transcoder: Arc::new(FakeTranscoder),
            transcriber: Arc::new(FakeTranscriber),
            renderer: renderer.clone(),
        };
        let selector = FootageSelector::new(footage.clone(), SelectorConfig::default());
        let music = MusicSelector::new(vec![
            Music::new("calm.mp3", "http://music.test/calm.mp3", MusicMood::Chill),
            Music::new("night.mp3", "http://music.test/night.mp3", MusicMood::Dark),
            Music::new("sunny.mp3", "http://music.test/sunny.mp3", MusicMood::Happy)
                .with_segment(0.0, 60.0),
        ]);

        let ctx = ProcessingContext::new(config, engines, selector, music);
        let creator = ShortCreator::start(ctx).await.unwrap();

        Self {
            creator,
            renderer,
            footage,
            dir,
        }
    }

    async fn with_defaults() -> Self {
        Self::start(
            FakeFootage::new(FootageMode::Unique),
            FakeRenderer::default(),
        )
        .await
    }

    async fn wait(&self, id: &JobId) -> VideoStatus {
        for _ in 0..500 {
            let status = self.creator.status(id).await;
            if status != VideoStatus::Processing {
                return status;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("job {id} did not finish");
    }

    async fn wait_for_renders(&self, count: usize) {
        for _ in 0..500 {
            if self.renderer.renders().len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("renderer was not reached");
    }

    fn temp_entries(&self) -> usize {
        match std::fs::read_dir(self.dir.path().join("temp")) {
            Ok(entries) => entries.count(),
            Err(_) => 0,
        }
    }
}

fn scene(text: &str, terms: &[&str]) -> SceneInput {
    SceneInput::new(text, terms.iter().map(|t| t.to_string()).collect())
}

fn three_scenes() -> Vec<SceneInput> {
    vec![
        scene("The ocean is deep", &["ocean", "waves"]),
        scene("Mountains rise above", &["mountain"]),
        scene("Cities never sleep", &["city", "night"]),
    ]
}

// Tests

#[tokio::test]
async fn test_job_renders_composition() {
    let h = Harness::with_defaults().await;
    let id = h
        .creator
        .enqueue(three_scenes(), RenderConfig::default().with_music(MusicMood::Chill))
        .await
        .unwrap();

    assert_eq!(h.wait(&id).await, VideoStatus::Ready);
    assert_eq!(h.creator.get_video(&id).await.unwrap(), b"mp4");

    let composition = h.renderer.composition(&id);
    assert_eq!(composition.scenes.len(), 3);
    assert_eq!(composition.music.mood, MusicMood::Chill);

    let footage: HashSet<_> = composition.scenes.iter().map(|s| s.video.clone()).collect();
    assert_eq!(footage.len(), 3, "footage must not repeat within a job");

    let first = &composition.scenes[0];
    assert!(first
        .audio
        .url
        .starts_with(&format!("http://localhost:3123/api/tmp/{id}/")));
    assert!(first.audio.url.ends_with(".mp3"));
    let words: Vec<_> = first.captions.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(words, vec![" The", " ocean", " is", " deep"]);

    let record = h.creator.job_state(&id).await.unwrap();
    assert_eq!(record.state, JobState::Completed);
    assert_eq!(h.temp_entries(), 0);
}

#[tokio::test]
async fn test_padding_extends_last_scene_and_total() {
    let h = Harness::with_defaults().await;
    let id = h
        .creator
        .enqueue(three_scenes(), RenderConfig::default().with_padding_back_ms(1500))
        .await
        .unwrap();
    assert_eq!(h.wait(&id).await, VideoStatus::Ready);

    let composition = h.renderer.composition(&id);
    let durations: Vec<f64> = composition
        .scenes
        .iter()
        .map(|s| s.audio.duration_seconds)
        .collect();
    assert_eq!(durations, vec![4.0, 4.0, 5.5]);
    assert_eq!(composition.duration_ms, 15000);
    assert_eq!(composition.padding_back_ms, Some(1500));
}

#[tokio::test]
async fn test_footage_length_ignores_padding() {
    // 4s of speech needs 7s of footage; with padding counted it would need 12s.
    let h = Harness::start(
        FakeFootage::new(FootageMode::Fixed(vec![clip("short", 8.0)])),
        FakeRenderer::default(),
    )
    .await;

    let id = h
        .creator
        .enqueue(
            vec![scene("Only scene", &["forest"])],
            RenderConfig::default().with_padding_back_ms(5000),
        )
        .await
        .unwrap();

    assert_eq!(h.wait(&id).await, VideoStatus::Ready);
    let composition = h.renderer.composition(&id);
    assert_eq!(composition.scenes[0].video, "https://footage.test/short.mp4");
    assert_eq!(composition.duration_ms, 14000);
}

#[tokio::test]
async fn test_no_footage_fails_job_and_cleans_up() {
    let h = Harness::start(
        FakeFootage::new(FootageMode::Empty),
        FakeRenderer::default(),
    )
    .await;

    let id = h
        .creator
        .enqueue(vec![scene("Nothing to see", &["void"])], RenderConfig::default())
        .await
        .unwrap();

    assert_eq!(h.wait(&id).await, VideoStatus::Failed);

    let record = h.creator.job_state(&id).await.unwrap();
    assert_eq!(record.state, JobState::Failed);
    assert!(record.error.unwrap().contains("No footage found"));

    // One user term plus four fallback terms.
    assert_eq!(h.footage.searches.load(Ordering::SeqCst), 5);
    assert!(h.renderer.renders().is_empty());
    assert_eq!(h.temp_entries(), 0);

    let err = h.creator.get_video(&id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_jobs_run_one_at_a_time_in_order() {
    let gate = Arc::new(Semaphore::new(0));
    let h = Harness::start(
        FakeFootage::new(FootageMode::Unique),
        FakeRenderer::gated(gate.clone()),
    )
    .await;

    let mut ids = Vec::new();
    for text in ["First", "Second", "Third"] {
        let id = h
            .creator
            .enqueue(vec![scene(text, &["sky"])], RenderConfig::default())
            .await
            .unwrap();
        ids.push(id);
    }

    h.wait_for_renders(1).await;
    assert_eq!(h.renderer.renders().len(), 1);

    for (position, id) in ids.iter().enumerate() {
        assert_eq!(h.creator.status(id).await, VideoStatus::Processing);
        assert_eq!(h.creator.queue_position(id).await, Some(position));
    }
    assert_eq!(
        h.creator.job_state(&ids[0]).await.unwrap().state,
        JobState::Processing
    );
    assert_eq!(
        h.creator.job_state(&ids[2]).await.unwrap().state,
        JobState::Queued
    );

    gate.add_permits(1);
    for id in &ids {
        assert_eq!(h.wait(id).await, VideoStatus::Ready);
    }

    let rendered: Vec<JobId> = h.renderer.renders().into_iter().map(|(id, _)| id).collect();
    assert_eq!(rendered, ids);
    assert_eq!(h.renderer.max_active.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failed_job_does_not_block_queue() {
    let h = Harness::with_defaults().await;

    let failing = h
        .creator
        .enqueue(vec![scene("fail", &["sky"])], RenderConfig::default())
        .await
        .unwrap();
    let next = h
        .creator
        .enqueue(vec![scene("Fine", &["sky"])], RenderConfig::default())
        .await
        .unwrap();

    assert_eq!(h.wait(&failing).await, VideoStatus::Failed);
    assert_eq!(h.wait(&next).await, VideoStatus::Ready);

    let error = h.creator.job_state(&failing).await.unwrap().error.unwrap();
    assert!(error.contains("Scene 0 failed"));
    assert!(error.contains("voice model unavailable"));
}

#[tokio::test]
async fn test_panicking_engine_fails_only_its_job() {
    let h = Harness::with_defaults().await;

    let panicking = h
        .creator
        .enqueue(
            vec![scene("Fine", &["sky"]), scene("panic", &["sky"])],
            RenderConfig::default(),
        )
        .await
        .unwrap();
    let next = h
        .creator
        .enqueue(vec![scene("Still fine", &["sky"])], RenderConfig::default())
        .await
        .unwrap();

    assert_eq!(h.wait(&panicking).await, VideoStatus::Failed);
    assert_eq!(h.wait(&next).await, VideoStatus::Ready);

    let record = h.creator.job_state(&panicking).await.unwrap();
    assert_eq!(record.state, JobState::Failed);
    assert!(record.error.unwrap().contains("panicked"));
    assert_eq!(h.temp_entries(), 0);
}

#[tokio::test]
async fn test_render_failure_leaves_no_video() {
    let h = Harness::start(
        FakeFootage::new(FootageMode::Unique),
        FakeRenderer {
            fail: true,
            ..FakeRenderer::default()
        },
    )
    .await;

    let id = h
        .creator
        .enqueue(vec![scene("Hello", &["sky"])], RenderConfig::default())
        .await
        .unwrap();

    assert_eq!(h.wait(&id).await, VideoStatus::Failed);
    assert!(!h.creator.video_path(&id).exists());
}

#[tokio::test]
async fn test_missing_music_mood_fails_job() {
    let h = Harness::with_defaults().await;
    let id = h
        .creator
        .enqueue(
            vec![scene("Hello", &["sky"])],
            RenderConfig::default().with_music(MusicMood::Funny),
        )
        .await
        .unwrap();

    assert_eq!(h.wait(&id).await, VideoStatus::Failed);
    let error = h.creator.job_state(&id).await.unwrap().error.unwrap();
    assert!(error.contains("No music available for mood 'funny'"));
    assert!(h.renderer.renders().is_empty());
}

#[tokio::test]
async fn test_invalid_requests_are_rejected() {
    let h = Harness::with_defaults().await;

    let err = h
        .creator
        .enqueue(vec![], RenderConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, WorkerError::InvalidRequest(_)));

    let err = h
        .creator
        .enqueue(vec![scene("No terms", &[])], RenderConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, WorkerError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_delete_video() {
    let h = Harness::with_defaults().await;
    let id = h
        .creator
        .enqueue(vec![scene("Hello", &["sky"])], RenderConfig::default())
        .await
        .unwrap();
    assert_eq!(h.wait(&id).await, VideoStatus::Ready);

    assert!(h.creator.job_state(&id).await.is_some());

    h.creator.delete_video(&id).await.unwrap();
    assert_eq!(h.creator.status(&id).await, VideoStatus::Failed);
    assert!(h.creator.job_state(&id).await.is_none());
    h.creator.delete_video(&id).await.unwrap();
}

#[tokio::test]
async fn test_shutdown_fails_queued_jobs() {
    let gate = Arc::new(Semaphore::new(0));
    let h = Harness::start(
        FakeFootage::new(FootageMode::Unique),
        FakeRenderer::gated(gate.clone()),
    )
    .await;

    let first = h
        .creator
        .enqueue(vec![scene("First", &["sky"])], RenderConfig::default())
        .await
        .unwrap();
    let queued = h
        .creator
        .enqueue(vec![scene("Queued", &["sky"])], RenderConfig::default())
        .await
        .unwrap();
    h.wait_for_renders(1).await;

    tokio::join!(h.creator.shutdown(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        gate.add_permits(1);
    });

    assert_eq!(h.creator.status(&first).await, VideoStatus::Ready);
    assert_eq!(h.creator.status(&queued).await, VideoStatus::Failed);
    assert_eq!(h.creator.queue_position(&queued).await, None);

    let record = h.creator.job_state(&queued).await.unwrap();
    assert_eq!(record.state, JobState::Failed);
    assert!(record.error.unwrap().contains("shut down"));
    assert_eq!(h.renderer.renders().len(), 1);
}

#[tokio::test]
async fn test_unknown_job() {
    let h = Harness::with_defaults().await;
    let id = JobId::from_string("never-submitted");

    assert_eq!(h.creator.status(&id).await, VideoStatus::Failed);
    assert!(h.creator.job_state(&id).await.is_none());
    assert!(h.creator.queue_position(&id).await.is_none());
}

#[tokio::test]
async fn test_list_music_tags() {
    let h = Harness::with_defaults().await;
    let tags: Vec<_> = h.creator.list_music_tags().into_iter().collect();
    assert_eq!(tags, vec![MusicMood::Happy, MusicMood::Chill, MusicMood::Dark]);
}

#[tokio::test]
async fn test_shutdown_stops_accepting_jobs() {
    let h = Harness::with_defaults().await;
    h.creator.shutdown().await;
    h.creator.shutdown().await;

    let err = h
        .creator
        .enqueue(vec![scene("Late", &["sky"])], RenderConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, WorkerError::Queue(_)));
}
