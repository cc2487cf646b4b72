//! The generation driver.
//!
//! A [`GenerationSession`] takes a model through these phases:
//!
//! 1. match registered generators against the requested targets and
//!    languages,
//! 2. global prepare, then the fatal gate,
//! 3. shape traversal: resolve destinations, collect and prepare element
//!    generators, then the fatal gate again,
//! 4. subsort and generate,
//! 5. drain the post-generate task queue against the uncommitted results.
//!
//! Everything runs inside [`GenerationContext::run`], so generator code can
//! reach the context through [`GenerationContext::current`].

use std::{path::PathBuf, sync::Arc};

use eyre::Result;
use indexmap::{IndexMap, IndexSet};
use shapegen_core::{GenerationLogger, GenerationTarget, LanguageWithVersion, Settings};
use shapegen_model::{Model, Shape, ShapeId};

use crate::{
    DestinationMap, DestinationResolver, GenerationContext, GenerationError, GenerationResults,
    GeneratorRegistry, MatchedGenerator, ModelElementGenerator, PostGenerateTask, Problems,
    ShapeRequest,
    subsort::{is_permutation, partial_reorder},
};

/// Configuration for a [`GenerationSession`].
pub struct SessionBuilder {
    registry: GeneratorRegistry,
    languages: IndexSet<LanguageWithVersion>,
    targets: IndexSet<GenerationTarget>,
    settings: Settings,
    destinations: Option<Arc<dyn DestinationResolver>>,
}

impl SessionBuilder {
    pub fn language(mut self, language: LanguageWithVersion) -> Self {
        self.languages.insert(language);
        self
    }

    pub fn languages(mut self, languages: impl IntoIterator<Item = LanguageWithVersion>) -> Self {
        self.languages.extend(languages);
        self
    }

    pub fn target(mut self, target: GenerationTarget) -> Self {
        self.targets.insert(target);
        self
    }

    pub fn targets(mut self, targets: impl IntoIterator<Item = GenerationTarget>) -> Self {
        self.targets.extend(targets);
        self
    }

    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Defaults to a [`DestinationMap`] over the current directory.
    pub fn destinations(mut self, resolver: Arc<dyn DestinationResolver>) -> Self {
        self.destinations = Some(resolver);
        self
    }

    /// Fails with [`GenerationError::NoLanguages`] or
    /// [`GenerationError::NoTargets`] when nothing was requested.
    pub fn build(self) -> Result<GenerationSession> {
        if self.languages.is_empty() {
            return Err(GenerationError::NoLanguages.into());
        }
        if self.targets.is_empty() {
            return Err(GenerationError::NoTargets.into());
        }
        let destinations = match self.destinations {
            Some(resolver) => resolver,
            None => Arc::new(DestinationMap::new(std::env::current_dir()?)),
        };
        let ctx = Arc::new(GenerationContext::new(
            Arc::new(self.settings),
            destinations,
        ));
        Ok(GenerationSession {
            registry: self.registry,
            languages: self.languages.into_iter().collect(),
            targets: self.targets.into_iter().collect(),
            ctx,
        })
    }
}

struct Recorded {
    plugin: usize,
    generator: Box<dyn ModelElementGenerator>,
}

/// One generation run over a model.
pub struct GenerationSession {
    registry: GeneratorRegistry,
    languages: Vec<LanguageWithVersion>,
    targets: Vec<GenerationTarget>,
    ctx: Arc<GenerationContext>,
}

impl GenerationSession {
    pub fn builder(registry: GeneratorRegistry) -> SessionBuilder {
        SessionBuilder {
            registry,
            languages: IndexSet::new(),
            targets: IndexSet::new(),
            settings: Settings::default(),
            destinations: None,
        }
    }

    pub fn context(&self) -> &Arc<GenerationContext> {
        &self.ctx
    }

    pub fn languages(&self) -> &[LanguageWithVersion] {
        &self.languages
    }

    pub fn targets(&self) -> &[GenerationTarget] {
        &self.targets
    }

    pub fn registry(&self) -> &GeneratorRegistry {
        &self.registry
    }

    /// Queue a post-generate task. See [`crate::PostTaskQueue::register`].
    pub fn register_post_task<T, F>(&self, name: impl Into<String>, factory: F) -> bool
    where
        T: PostGenerateTask + 'static,
        F: FnOnce() -> T,
    {
        self.ctx.post_tasks().register(name, factory)
    }

    /// Run every phase up to, but not including, commit.
    ///
    /// Only shapes for which `filter` returns true are visited. Prelude and
    /// member shapes are never visited on their own.
    pub fn generate(
        &self,
        model: &Model,
        filter: impl Fn(&ShapeId) -> bool,
        logger: &GenerationLogger,
    ) -> Result<GenerationResults> {
        self.ctx.run(|| self.run_phases(model, &filter, logger))
    }

    /// Every destination root a [`generate`](Self::generate) call with the
    /// same arguments would resolve, without preparing or generating.
    pub fn resolve_roots(
        &self,
        model: &Model,
        filter: impl Fn(&ShapeId) -> bool,
    ) -> IndexSet<PathBuf> {
        let matched = self.registry.matching(&self.targets, &self.languages);
        let settings = self.ctx.settings();
        let mut roots = IndexSet::new();
        for shape in visited_shapes(model, &filter) {
            for m in &matched {
                for language in &m.languages {
                    for target in &m.targets {
                        roots.insert(self.ctx.destinations().resolve(
                            target, shape, language, settings,
                        ));
                    }
                }
            }
        }
        roots
    }

    fn run_phases(
        &self,
        model: &Model,
        filter: &dyn Fn(&ShapeId) -> bool,
        logger: &GenerationLogger,
    ) -> Result<GenerationResults> {
        let matched = self.registry.matching(&self.targets, &self.languages);
        if matched.is_empty() {
            logger.error(format!(
                "No generators matched targets [{}] and languages [{}]",
                join(&self.targets),
                join(&self.languages)
            ));
            return Ok(GenerationResults::empty(Arc::clone(&self.ctx)));
        }
        tracing::debug!(
            "{} generator(s) matched: {}",
            matched.len(),
            matched
                .iter()
                .map(|m| m.generator.name())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let mut problems = Problems::new();
        for m in &matched {
            m.generator.prepare(model, &self.ctx, &mut problems)?;
        }
        fatal_gate(&problems)?;

        let (recorded, roots) = self.collect(model, filter, &matched, &mut problems, logger)?;
        fatal_gate(&problems)?;
        if !problems.is_empty() {
            logger.warn(format!("Problems:\n{}", problems));
        }

        let ordered = self.subsort(model, &matched, recorded, logger);
        tracing::debug!("generating {} element(s)", ordered.len());
        let mut generated = Vec::new();
        for item in &ordered {
            let shape_logger = logger.child(item.generator.shape());
            generated.extend(item.generator.generate(&self.ctx, &shape_logger)?);
        }

        let results = GenerationResults::new(Arc::clone(&self.ctx), generated, roots);
        let rounds =
            self.ctx
                .post_tasks()
                .drain(&self.ctx, model, &results, &logger.child("post-tasks"))?;
        tracing::debug!("post-generate tasks finished in {} round(s)", rounds);
        Ok(results)
    }

    /// Shape traversal. Returns the element generators in language-then-shape
    /// order, and every resolved root.
    fn collect(
        &self,
        model: &Model,
        filter: &dyn Fn(&ShapeId) -> bool,
        matched: &[MatchedGenerator],
        problems: &mut Problems,
        logger: &GenerationLogger,
    ) -> Result<(Vec<Recorded>, IndexSet<PathBuf>)> {
        let settings = self.ctx.settings();
        let mut initialized = vec![false; matched.len()];
        let mut roots = IndexSet::new();
        let mut recorded: IndexMap<LanguageWithVersion, IndexMap<ShapeId, Vec<Recorded>>> =
            IndexMap::new();

        for shape in visited_shapes(model, filter) {
            for (plugin, m) in matched.iter().enumerate() {
                if !initialized[plugin] {
                    m.generator.prepare(model, &self.ctx, problems)?;
                    initialized[plugin] = true;
                }
                for language in &m.languages {
                    for target in &m.targets {
                        let destination =
                            self.ctx.destinations().resolve(target, shape, language, settings);
                        roots.insert(destination.clone());
                        let request = ShapeRequest {
                            shape,
                            model,
                            destination: &destination,
                            target,
                            language,
                            settings,
                            logger,
                        };
                        let generators = m.generator.generators_for(&request)?;
                        if generators.is_empty() {
                            continue;
                        }
                        let slot = recorded
                            .entry(language.clone())
                            .or_default()
                            .entry(shape.id().clone())
                            .or_default();
                        for mut generator in generators {
                            generator.prepare(target, model, &self.ctx, problems)?;
                            slot.push(Recorded { plugin, generator });
                        }
                    }
                }
            }
        }

        let ordered = recorded
            .into_values()
            .flat_map(|shapes| shapes.into_values().flatten())
            .collect();
        Ok((ordered, roots))
    }

    fn subsort(
        &self,
        model: &Model,
        matched: &[MatchedGenerator],
        mut ordered: Vec<Recorded>,
        logger: &GenerationLogger,
    ) -> Vec<Recorded> {
        for (plugin, m) in matched.iter().enumerate() {
            let positions: Vec<usize> = ordered
                .iter()
                .enumerate()
                .filter(|(_, item)| item.plugin == plugin)
                .map(|(index, _)| index)
                .collect();
            if positions.is_empty() {
                continue;
            }
            let order = {
                let own: Vec<&dyn ModelElementGenerator> = positions
                    .iter()
                    .map(|&p| ordered[p].generator.as_ref())
                    .collect();
                m.generator.subsort(model, &own)
            };
            let Some(order) = order else {
                continue;
            };
            if is_permutation(&order, positions.len()) {
                ordered = partial_reorder(ordered, &positions, &order);
            } else {
                logger.warn(
                    GenerationError::InvalidSubsort {
                        generator: m.generator.name().to_string(),
                    }
                    .to_string(),
                );
            }
        }
        ordered
    }
}

impl std::fmt::Debug for GenerationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationSession")
            .field("registry", &self.registry)
            .field("languages", &self.languages)
            .field("targets", &self.targets)
            .finish_non_exhaustive()
    }
}

/// Shapes the session visits: not prelude, not members, accepted by `filter`.
fn visited_shapes<'m>(
    model: &'m Model,
    filter: &'m dyn Fn(&ShapeId) -> bool,
) -> impl Iterator<Item = &'m Shape> {
    model
        .shapes()
        .filter(move |shape| !shape.id().is_prelude() && !shape.is_member() && filter(shape.id()))
}

fn fatal_gate(problems: &Problems) -> Result<()> {
    if problems.has_fatal() {
        return Err(GenerationError::FatalProblems {
            problems: problems.clone(),
        }
        .into());
    }
    Ok(())
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use shapegen_core::{GenerationSwitch, Level};

    use super::*;
    use crate::{
        post_task,
        testing::{FakeGenerator, RecordingSink, TestWorkspace, sample_model},
    };

    fn java_model() -> FakeGenerator {
        FakeGenerator::new("java")
            .language("java")
            .target(GenerationTarget::MODEL)
    }

    fn session(ws: &TestWorkspace, registry: GeneratorRegistry) -> GenerationSession {
        session_with(ws, registry, Settings::default())
    }

    fn session_with(
        ws: &TestWorkspace,
        registry: GeneratorRegistry,
        settings: Settings,
    ) -> GenerationSession {
        GenerationSession::builder(registry)
            .language(LanguageWithVersion::parse("java-11"))
            .target(GenerationTarget::MODEL)
            .settings(settings)
            .destinations(ws.resolver())
            .build()
            .unwrap()
    }

    fn file_names(results: &GenerationResults) -> Vec<String> {
        results
            .destinations()
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_empty_request_fails_fast() {
        let err = GenerationSession::builder(GeneratorRegistry::new())
            .target(GenerationTarget::MODEL)
            .build()
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GenerationError>(),
            Some(GenerationError::NoLanguages)
        ));

        let err = GenerationSession::builder(GeneratorRegistry::new())
            .language(LanguageWithVersion::parse("java"))
            .build()
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GenerationError>(),
            Some(GenerationError::NoTargets)
        ));
    }

    #[test]
    fn test_generates_every_visited_shape() {
        let ws = TestWorkspace::new();
        let sink = RecordingSink::new();
        let session = session(&ws, GeneratorRegistry::new().with(java_model()));

        let results = session
            .generate(&sample_model(), |_| true, &sink.logger())
            .unwrap();

        assert_eq!(
            file_names(&results),
            vec![
                "java-Percent.txt",
                "java-Name.txt",
                "java-Color.txt",
                "java-Person.txt"
            ]
        );
        assert_eq!(
            results.roots().iter().collect::<Vec<_>>(),
            vec![&ws.root().join("java").join("model")]
        );
        assert!(sink.contains(Level::Info, "com.example#Percent:generating"));
    }

    #[test]
    fn test_filter_limits_shapes() {
        let ws = TestWorkspace::new();
        let session = session(&ws, GeneratorRegistry::new().with(java_model()));

        let results = session
            .generate(
                &sample_model(),
                |id| id.name().starts_with('P'),
                &RecordingSink::new().logger(),
            )
            .unwrap();

        assert_eq!(
            file_names(&results),
            vec!["java-Percent.txt", "java-Person.txt"]
        );
    }

    #[test]
    fn test_no_match_logs_and_returns_empty() {
        let ws = TestWorkspace::new();
        let sink = RecordingSink::new();
        let ts = FakeGenerator::new("ts")
            .language("typescript")
            .target(GenerationTarget::MODEL);
        let stats = ts.stats();
        let session = session(&ws, GeneratorRegistry::new().with(ts));

        let results = session
            .generate(&sample_model(), |_| true, &sink.logger())
            .unwrap();

        assert!(results.is_empty());
        assert!(sink.contains(Level::Error, "No generators matched"));
        assert_eq!(stats.prepare_calls(), 0);
    }

    #[test]
    fn test_fatal_problem_stops_before_generate() {
        let ws = TestWorkspace::new();
        let broken = java_model().fatal_on("Color");
        let healthy = FakeGenerator::new("other")
            .language("java")
            .target(GenerationTarget::MODEL);
        let broken_stats = broken.stats();
        let healthy_stats = healthy.stats();
        let session = session(&ws, GeneratorRegistry::new().with(broken).with(healthy));

        let err = session
            .generate(&sample_model(), |_| true, &RecordingSink::new().logger())
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<GenerationError>(),
            Some(GenerationError::FatalProblems { .. })
        ));
        assert!(err.to_string().contains("(fatal) java cannot handle com.example#Color"));
        assert_eq!(broken_stats.generate_calls(), 0);
        assert_eq!(healthy_stats.generate_calls(), 0);
        assert!(ws.snapshot().is_empty());
    }

    #[test]
    fn test_fatal_problem_in_global_prepare() {
        let ws = TestWorkspace::new();
        let generator = java_model().fatal_in_prepare("missing java.package-prefix");
        let stats = generator.stats();
        let session = session(&ws, GeneratorRegistry::new().with(generator));

        let err = session
            .generate(&sample_model(), |_| true, &RecordingSink::new().logger())
            .unwrap_err();

        assert!(err.to_string().contains("missing java.package-prefix"));
        assert_eq!(stats.prepare_calls(), 1);
        assert_eq!(stats.element_prepare_calls(), 0);
    }

    #[test]
    fn test_prepare_hooks_call_counts() {
        let ws = TestWorkspace::new();
        let generator = java_model();
        let stats = generator.stats();
        let session = session(&ws, GeneratorRegistry::new().with(generator));

        session
            .generate(&sample_model(), |_| true, &RecordingSink::new().logger())
            .unwrap();

        // once globally, once before the first shape
        assert_eq!(stats.prepare_calls(), 2);
        assert_eq!(stats.element_prepare_calls(), 4);
        assert_eq!(stats.generate_calls(), 4);
    }

    #[test]
    fn test_language_then_shape_order() {
        let ws = TestWorkspace::new();
        let both = FakeGenerator::new("multi")
            .language("java")
            .language("typescript")
            .target(GenerationTarget::MODEL);
        let session = GenerationSession::builder(GeneratorRegistry::new().with(both))
            .language(LanguageWithVersion::parse("java-11"))
            .language(LanguageWithVersion::parse("typescript"))
            .target(GenerationTarget::MODEL)
            .destinations(ws.resolver())
            .build()
            .unwrap();

        let results = session
            .generate(
                &sample_model(),
                |id| id.name() != "Person",
                &RecordingSink::new().logger(),
            )
            .unwrap();

        let dirs: Vec<String> = results
            .destinations()
            .iter()
            .map(|p| {
                let lang = p.parent().and_then(|d| d.parent()).and_then(|d| d.file_name());
                format!(
                    "{}/{}",
                    lang.map(|l| l.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    p.file_name().unwrap().to_string_lossy()
                )
            })
            .collect();
        assert_eq!(
            dirs,
            vec![
                "java/multi-Percent.txt",
                "java/multi-Name.txt",
                "java/multi-Color.txt",
                "typescript/multi-Percent.txt",
                "typescript/multi-Name.txt",
                "typescript/multi-Color.txt",
            ]
        );
    }

    #[test]
    fn test_subsort_reorders_only_own_generators() {
        let ws = TestWorkspace::new();
        let a = FakeGenerator::new("a")
            .language("java")
            .target(GenerationTarget::MODEL)
            .reverse_subsort();
        let b = FakeGenerator::new("b")
            .language("java")
            .target(GenerationTarget::MODEL);
        let session = session(&ws, GeneratorRegistry::new().with(a).with(b));

        let results = session
            .generate(
                &sample_model(),
                |id| id.name() != "Person",
                &RecordingSink::new().logger(),
            )
            .unwrap();

        assert_eq!(
            file_names(&results),
            vec![
                "a-Color.txt",
                "a-Name.txt",
                "a-Percent.txt",
                "b-Percent.txt",
                "b-Name.txt",
                "b-Color.txt",
            ]
        );
    }

    #[test]
    fn test_invalid_subsort_is_ignored() {
        let ws = TestWorkspace::new();
        let sink = RecordingSink::new();
        let a = java_model().invalid_subsort();
        let session = session(&ws, GeneratorRegistry::new().with(a));

        let results = session
            .generate(&sample_model(), |id| id.name() != "Person", &sink.logger())
            .unwrap();

        assert_eq!(
            file_names(&results),
            vec!["java-Percent.txt", "java-Name.txt", "java-Color.txt"]
        );
        assert!(sink.contains(Level::Warn, "not a permutation"));
    }

    #[test]
    fn test_escaping_generator_fails_commit_and_writes_nothing() {
        let ws = TestWorkspace::new();
        fs::create_dir_all(ws.root().join("java/model/stale")).unwrap();
        let before = ws.snapshot();
        let session = session(
            &ws,
            GeneratorRegistry::new().with(java_model().escape_on("Name")),
        );

        let results = session
            .generate(&sample_model(), |_| true, &RecordingSink::new().logger())
            .unwrap();
        let err = results.commit().unwrap_err();

        match err.downcast_ref::<GenerationError>() {
            Some(GenerationError::OutsideSourceRoots { paths, .. }) => {
                assert_eq!(paths, &vec![ws.root().join("escaped/java-Name.txt")]);
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(ws.snapshot(), before);
    }

    #[test]
    fn test_committed_paths_are_under_roots() {
        let ws = TestWorkspace::new();
        let session = session(&ws, GeneratorRegistry::new().with(java_model()));
        let results = session
            .generate(&sample_model(), |_| true, &RecordingSink::new().logger())
            .unwrap();
        let roots = results.roots().clone();

        let written = results.commit().unwrap();

        assert_eq!(written.len(), 4);
        for path in &written {
            assert!(roots.iter().any(|root| path.starts_with(root)));
            assert!(path.exists());
        }
    }

    fn dry_run_observations(dry_run: bool) -> (Vec<(String, String)>, Vec<PathBuf>, Vec<String>) {
        let ws = TestWorkspace::new();
        fs::create_dir_all(ws.root().join("java/model/stale")).unwrap();
        let before = ws.snapshot();
        let settings = Settings::builder()
            .with_switch_if(dry_run, GenerationSwitch::DryRun)
            .build();
        let session = session_with(&ws, GeneratorRegistry::new().with(java_model()), settings);
        let sink = RecordingSink::new();
        session.register_post_task("observe", || {
            post_task::from_fn(|_, _, results, _, logger| {
                let logger = logger.clone();
                results.on_commit(move |paths| {
                    logger.info(format!("committed {}", paths.len()));
                    Ok(())
                });
                Ok(())
            })
        });

        let results = session
            .generate(&sample_model(), |_| true, &sink.logger())
            .unwrap();
        let written: Vec<PathBuf> = results
            .commit()
            .unwrap()
            .into_iter()
            .map(|p| p.strip_prefix(ws.root()).unwrap().to_path_buf())
            .collect();
        if dry_run {
            assert_eq!(ws.snapshot(), before);
        }
        (before, written, sink.messages(Level::Info))
    }

    #[test]
    fn test_dry_run_matches_real_run_without_touching_disk() {
        let (_, dry_written, dry_log) = dry_run_observations(true);
        let (_, written, log) = dry_run_observations(false);

        assert_eq!(dry_written, written);
        assert!(dry_log.contains(&"post-tasks:observe:committed 4".to_string()));
        assert!(log.contains(&"post-tasks:observe:committed 4".to_string()));
    }

    #[test]
    fn test_ambient_context_during_generate() {
        let ws = TestWorkspace::new();
        let session = session(&ws, GeneratorRegistry::new().with(java_model()));
        assert!(GenerationContext::current().is_none());

        let expected = Arc::clone(session.context());
        session.register_post_task("check-ambient", move || {
            post_task::from_fn(move |_, _, _, _, _| {
                let current = GenerationContext::current().expect("ambient context");
                assert!(Arc::ptr_eq(&current, &expected));
                Ok(())
            })
        });
        session
            .generate(&sample_model(), |_| true, &RecordingSink::new().logger())
            .unwrap();

        assert!(GenerationContext::current().is_none());
    }

    #[test]
    fn test_ambient_context_restored_after_error() {
        let ws = TestWorkspace::new();
        let session = session(
            &ws,
            GeneratorRegistry::new().with(java_model().fatal_on("Percent")),
        );
        assert!(session
            .generate(&sample_model(), |_| true, &RecordingSink::new().logger())
            .is_err());
        assert!(GenerationContext::current().is_none());
    }

    #[test]
    fn test_generators_can_queue_post_tasks() {
        let ws = TestWorkspace::new();
        let session = session(&ws, GeneratorRegistry::new().with(java_model()));
        let sink = RecordingSink::new();
        for name in ["first", "first", "second"] {
            session.register_post_task(name, move || {
                post_task::from_fn(move |_, _, _, _, logger| {
                    logger.info(name);
                    Ok(())
                })
            });
        }

        session
            .generate(&sample_model(), |_| true, &sink.logger())
            .unwrap();

        let ran: Vec<String> = sink
            .messages(Level::Info)
            .into_iter()
            .filter(|m| m.starts_with("post-tasks:"))
            .collect();
        assert_eq!(ran, vec!["post-tasks:first:first", "post-tasks:second:second"]);
    }

    #[test]
    fn test_generator_queued_task_runs_every_generate() {
        let ws = TestWorkspace::new();
        let session = session(&ws, GeneratorRegistry::new().with(java_model()));
        let sink = RecordingSink::new();
        for _ in 0..2 {
            session.register_post_task("each-run", || {
                post_task::from_fn(|_, _, _, _, logger| {
                    logger.info("ran");
                    Ok(())
                })
            });
            session
                .generate(&sample_model(), |_| true, &sink.logger())
                .unwrap();
        }
        let runs = sink
            .messages(Level::Info)
            .into_iter()
            .filter(|m| m == "post-tasks:each-run:ran")
            .count();
        assert_eq!(runs, 2);
    }

    #[test]
    fn test_round_trip_with_clean_keeps_one_copy() {
        let ws = TestWorkspace::new();
        for _ in 0..2 {
            let session = session(&ws, GeneratorRegistry::new().with(java_model()));
            let results = session
                .generate(
                    &sample_model(),
                    |id| id.name() == "Percent",
                    &RecordingSink::new().logger(),
                )
                .unwrap();
            assert_eq!(results.len(), 1);
            results.commit().unwrap();
        }

        let files: Vec<String> = ws
            .snapshot()
            .into_iter()
            .map(|(path, _)| path)
            .filter(|path| path.ends_with(".txt") && !path.ends_with("000-IMPORTANT.txt"))
            .collect();
        assert_eq!(files, vec!["java/model/java-Percent.txt"]);
    }

    #[test]
    fn test_resolve_roots_matches_generate() {
        let ws = TestWorkspace::new();
        let session = session(&ws, GeneratorRegistry::new().with(java_model()));
        let model = sample_model();
        let roots = session.resolve_roots(&model, |_| true);
        let results = session
            .generate(&model, |_| true, &RecordingSink::new().logger())
            .unwrap();
        assert_eq!(&roots, results.roots());
    }
}
