// water-marker/src/processors/batch.rs
use crate::core::processor::{JobStatus, OverlayProcessor, ProcessingJob};
use crate::core::{OverlayConfig, Result};
use crate::processors::progress::{PipelineEvent, ProgressReporter};
use crate::processors::prelude::*;
use crate::utils::{build_folder_pairs, list_entries, FolderPair};
use image::Limits;
use std::path::PathBuf;

/// Counts for one run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub completed: usize,
    pub skipped_existing: usize,
    pub unreadable: usize,
    pub failed: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
}

/// Walks folder pairs sequentially and overlays every entry whose output is missing.
pub struct BatchPipeline<C: ImageCodec = Loader> {
    codec: C,
    processor: OverlayProcessor,
    cache: ResizeCache,
}

impl BatchPipeline<Loader> {
    /// Validates `config`, loads the overlay and resolves the geometry once.
    /// Fails before any folder is touched.
    pub fn from_config(config: &OverlayConfig) -> Result<Self> {
        config.validate()?;

        let mut loader = Loader::new();
        loader = match config.max_dimensions {
            Some((w, h)) => loader.with_max_dimensions(w, h),
            None => loader.without_max_dimensions(),
        };

        let overlay = loader.load_overlay(&config.overlay_path)?;
        let geometry = config.geometry();

        log::info!(
            "Sizing {:?}, offset {:?}, corner {}",
            geometry.sizing,
            geometry.offset,
            config.corner
        );

        let limits = loader.limits();
        Ok(Self::new(
            loader,
            OverlayProcessor::new(overlay, geometry, config.corner),
        )
        .with_resize_limits(limits))
    }
}

impl<C: ImageCodec> BatchPipeline<C> {
    pub fn new(codec: C, processor: OverlayProcessor) -> Self {
        Self {
            codec,
            processor,
            cache: ResizeCache::new(),
        }
    }

    /// Bounds applied to every rescaled overlay; a target beyond them fails the job.
    pub fn with_resize_limits(mut self, limits: Limits) -> Self {
        self.cache = ResizeCache::with_limits(limits);
        self
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn cache(&self) -> &ResizeCache {
        &self.cache
    }

    /// Expands the template for each input folder, then runs.
    pub fn run_folders(
        &mut self,
        input_folders: &[PathBuf],
        output_template: &str,
        reporter: &mut dyn ProgressReporter,
    ) -> Result<BatchSummary> {
        let pairs = build_folder_pairs(input_folders, output_template)?;
        self.run(&pairs, reporter)
    }

    pub fn run(
        &mut self,
        pairs: &[FolderPair],
        reporter: &mut dyn ProgressReporter,
    ) -> Result<BatchSummary> {
        let listings = pairs
            .iter()
            .map(|pair| list_entries(&pair.input))
            .collect::<Result<Vec<_>>>()?;

        let total: usize = listings.iter().map(Vec::len).sum();
        let (hits_before, misses_before) = (self.cache.hits(), self.cache.misses());

        log::info!("Found {} entries in {} folder(s)", total, pairs.len());

        let mut summary = BatchSummary {
            total,
            ..Default::default()
        };
        let mut current = 0;

        reporter.report(&PipelineEvent::Started {
            total,
            folders: pairs.len(),
        });

        for (pair, entries) in pairs.iter().zip(listings) {
            reporter.report(&PipelineEvent::FolderStarted {
                input: pair.input.clone(),
                output: pair.output.clone(),
            });

            for source in entries {
                let Some(file_name) = source.file_name() else {
                    continue;
                };
                let mut job = ProcessingJob::new(source.clone(), pair.output.join(file_name));

                if job.output.exists() {
                    job.status = JobStatus::SkippedExisting;
                    current += 1;
                    summary.skipped_existing += 1;
                    reporter.report(&PipelineEvent::Skipped {
                        source: job.source,
                        output: job.output,
                        current,
                        total,
                    });
                    continue;
                }

                if !pair.output.exists() {
                    std::fs::create_dir_all(&pair.output)?;
                    log::debug!("Created output folder {}", pair.output.display());
                }

                if let Err(e) = self.processor.process(&self.codec, &mut self.cache, &mut job) {
                    log::warn!("Failed to overlay {}: {}", job.source.display(), e);
                    job.status = JobStatus::Failed(e.to_string());
                }

                match job.status {
                    JobStatus::Completed => {
                        current += 1;
                        summary.completed += 1;
                        reporter.report(&PipelineEvent::Completed {
                            source: job.source,
                            output: job.output,
                            current,
                            total,
                        });
                    }
                    JobStatus::SkippedUnreadable(reason) => {
                        summary.unreadable += 1;
                        reporter.report(&PipelineEvent::Unreadable {
                            source: job.source,
                            reason,
                        });
                    }
                    JobStatus::Failed(error) => {
                        summary.failed += 1;
                        reporter.report(&PipelineEvent::Failed {
                            source: job.source,
                            error,
                        });
                    }
                    JobStatus::Pending | JobStatus::SkippedExisting => {}
                }
            }
        }

        summary.cache_hits = self.cache.hits() - hits_before;
        summary.cache_misses = self.cache.misses() - misses_before;
        reporter.finish();

        log::info!(
            "Batch finished: {} completed, {} already present, {} unreadable, {} failed",
            summary.completed,
            summary.skipped_existing,
            summary.unreadable,
            summary.failed
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Geometry, OffsetPolicy, ReferenceCorner, SizingPolicy};
    use crate::processors::progress::RecordingReporter;
    use crate::processors::Decoded;
    use image::{Rgba, RgbImage, RgbaImage};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::Path;
    use tempfile::TempDir;

    /// Serves images from memory by file name and records saves on disk.
    #[derive(Default)]
    struct MockCodec {
        images: HashMap<String, (u32, u32)>,
        decoded: RefCell<Vec<String>>,
    }

    impl MockCodec {
        fn with(images: &[(&str, (u32, u32))]) -> Self {
            Self {
                images: images.iter().map(|(n, s)| (n.to_string(), *s)).collect(),
                decoded: RefCell::new(Vec::new()),
            }
        }
    }

    impl ImageCodec for MockCodec {
        fn decode(&self, path: &Path) -> Decoded {
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            self.decoded.borrow_mut().push(name.clone());
            match self.images.get(&name) {
                Some(&(w, h)) => Decoded::Image(RgbaImage::from_pixel(w, h, Rgba([9, 9, 9, 255]))),
                None => Decoded::Unreadable("mock".to_string()),
            }
        }

        fn save(&self, image: &RgbImage, path: &Path) -> Result<()> {
            std::fs::write(path, format!("{}x{}", image.width(), image.height()))?;
            Ok(())
        }
    }

    fn pipeline(codec: MockCodec) -> BatchPipeline<MockCodec> {
        let processor = OverlayProcessor::new(
            RgbaImage::from_pixel(100, 50, Rgba([255, 0, 0, 255])),
            Geometry {
                sizing: SizingPolicy::UniformBounded(0.1),
                offset: OffsetPolicy::CornerOffset(0.02),
            },
            ReferenceCorner::BottomRight,
        );
        BatchPipeline::new(codec, processor)
    }

    fn folder(names: &[&str]) -> (TempDir, FolderPair) {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in");
        std::fs::create_dir(&input).unwrap();
        for name in names {
            std::fs::write(input.join(name), b"placeholder").unwrap();
        }
        let pair = FolderPair {
            input,
            output: dir.path().join("out"),
        };
        (dir, pair)
    }

    #[test]
    fn test_same_size_destinations_hit_cache() {
        let (_dir, pair) = folder(&["a.jpg", "b.jpg"]);
        let mut pipeline = pipeline(MockCodec::with(&[("a.jpg", (800, 600)), ("b.jpg", (800, 600))]));
        let mut reporter = RecordingReporter::new();

        let summary = pipeline.run(&[pair], &mut reporter).unwrap();

        assert_eq!(summary.completed, 2);
        assert_eq!(summary.cache_misses, 1);
        assert_eq!(summary.cache_hits, 1);
    }

    #[test]
    fn test_differing_sizes_miss_cache() {
        let (_dir, pair) = folder(&["a.jpg", "b.jpg", "c.jpg"]);
        let mut pipeline = pipeline(MockCodec::with(&[
            ("a.jpg", (800, 600)),
            ("b.jpg", (640, 480)),
            ("c.jpg", (800, 600)),
        ]));

        let summary = pipeline.run(&[pair], &mut RecordingReporter::new()).unwrap();

        assert_eq!(summary.cache_misses, 3);
        assert_eq!(summary.cache_hits, 0);
    }

    #[test]
    fn test_unreadable_entry_does_not_advance_progress() {
        let (_dir, pair) = folder(&["a.jpg", "broken.jpg", "c.jpg"]);
        let output = pair.output.clone();
        let mut pipeline = pipeline(MockCodec::with(&[("a.jpg", (80, 60)), ("c.jpg", (80, 60))]));
        let mut reporter = RecordingReporter::new();

        let summary = pipeline.run(&[pair], &mut reporter).unwrap();

        assert_eq!(summary.total, 3);
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.unreadable, 1);
        assert!(output.join("a.jpg").exists());
        assert!(!output.join("broken.jpg").exists());
        assert!(output.join("c.jpg").exists());

        let counters: Vec<_> = reporter
            .events
            .iter()
            .filter_map(|e| match e {
                PipelineEvent::Completed { current, total, .. } => Some((*current, *total)),
                _ => None,
            })
            .collect();
        assert_eq!(counters, vec![(1, 3), (2, 3)]);
    }

    #[test]
    fn test_rerun_skips_everything() {
        let (_dir, pair) = folder(&["a.jpg", "b.jpg"]);
        let pairs = [pair];
        let mut first = pipeline(MockCodec::with(&[("a.jpg", (80, 60)), ("b.jpg", (80, 60))]));
        first.run(&pairs, &mut RecordingReporter::new()).unwrap();

        let mut second = pipeline(MockCodec::with(&[("a.jpg", (80, 60)), ("b.jpg", (80, 60))]));
        let mut reporter = RecordingReporter::new();
        let summary = second.run(&pairs, &mut reporter).unwrap();

        assert_eq!(summary.completed, 0);
        assert_eq!(summary.skipped_existing, 2);
        assert!(second.codec().decoded.borrow().is_empty());
        assert!(reporter.lines().iter().any(|l| l.ends_with("(2/2 completed)")));
    }

    #[test]
    fn test_save_failure_is_contained() {
        struct FailingSave(MockCodec);

        impl ImageCodec for FailingSave {
            fn decode(&self, path: &Path) -> Decoded {
                self.0.decode(path)
            }

            fn save(&self, _image: &RgbImage, path: &Path) -> Result<()> {
                if path.ends_with("bad.jpg") {
                    return Err(crate::core::OverlayError::InvalidParameter("boom".to_string()));
                }
                std::fs::write(path, b"ok")?;
                Ok(())
            }
        }

        let (_dir, pair) = folder(&["bad.jpg", "good.jpg"]);
        let processor = OverlayProcessor::new(
            RgbaImage::new(10, 10),
            Geometry {
                sizing: SizingPolicy::WidthBounded(0.5),
                offset: OffsetPolicy::NoOffset,
            },
            ReferenceCorner::TopLeft,
        );
        let codec = FailingSave(MockCodec::with(&[("bad.jpg", (20, 20)), ("good.jpg", (20, 20))]));
        let mut pipeline = BatchPipeline::new(codec, processor);

        let summary = pipeline.run(&[pair], &mut RecordingReporter::new()).unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.completed, 1);
    }

    #[test]
    fn test_oversized_overlay_fails_only_that_job() {
        let (_dir, pair) = folder(&["big.jpg", "small.jpg"]);
        let output = pair.output.clone();
        let processor = OverlayProcessor::new(
            RgbaImage::from_pixel(100, 50, Rgba([255, 0, 0, 255])),
            Geometry {
                // 1000% of the destination width
                sizing: SizingPolicy::UniformBounded(10.0),
                offset: OffsetPolicy::CornerOffset(0.02),
            },
            ReferenceCorner::BottomRight,
        );
        let mut limits = Limits::default();
        limits.max_image_width = Some(500);
        limits.max_image_height = Some(500);
        let codec = MockCodec::with(&[("big.jpg", (80, 60)), ("small.jpg", (40, 30))]);
        let mut pipeline = BatchPipeline::new(codec, processor).with_resize_limits(limits);
        let mut reporter = RecordingReporter::new();

        let summary = pipeline.run(&[pair], &mut reporter).unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.completed, 1);
        assert!(!output.join("big.jpg").exists());
        assert!(output.join("small.jpg").exists());
        assert!(reporter.events.iter().any(|e| matches!(
            e,
            PipelineEvent::Failed { error, .. } if error.contains("Memory limit exceeded")
        )));
    }
}
