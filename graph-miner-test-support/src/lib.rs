//! Shared test utilities used across graph-miner crates.

pub mod fixtures {
    //! Metadata tables and temporary resource directories.

    use std::{
        fs, io,
        path::{Path, PathBuf},
    };

    use tempfile::TempDir;

    /// Canonical name of the graph described by [`FOO_GRAPH_TABLE`].
    pub const FOO_GRAPH: &str = "FooGraph";

    /// Download URL of [`FOO_GRAPH`].
    pub const FOO_GRAPH_URL: &str = "http://example.com/foo.tsv";

    /// A one-graph metadata table whose arguments declare both list paths.
    pub const FOO_GRAPH_TABLE: &str = r#"{
    "FooGraph": {
        "urls": ["http://example.com/foo.tsv"],
        "arguments": {
            "edge_path": "foo/edges.tsv",
            "node_path": "foo/nodes.tsv",
            "directed": false
        }
    }
}"#;

    /// A three-graph table exercising ordering, per-graph citations, graphs
    /// without paths, and unrecognised arguments.
    pub const MIXED_TABLE: &str = r#"{
    "Zeta": {
        "urls": ["http://example.com/zeta/links.tsv.gz", "http://example.com/zeta/info.tsv"],
        "arguments": {
            "edge_path": "zeta/links.tsv",
            "directed": true,
            "weights_column": "score",
            "edge_rows_to_skip": 1
        },
        "citation": "@misc{zeta, title={Zeta}}"
    },
    "Alpha": {
        "urls": ["http://example.com/alpha.edges"],
        "arguments": {
            "edge_path": "alpha.edges",
            "node_path": "alpha.nodes"
        }
    },
    "Empty": {
        "urls": []
    }
}"#;

    /// Repository-wide citation written next to fixture tables.
    pub const FIXTURE_CITATION: &str = "@misc{fixture, title={Fixture repository}}\n";

    /// Temporary directory laid out like a directory of repository
    /// resources: `<stem>.json` tables and `<stem>.bib` citations.
    ///
    /// # Examples
    /// ```
    /// use graph_miner_test_support::fixtures::{FOO_GRAPH_TABLE, ResourceDir};
    ///
    /// let resources = ResourceDir::with_repository("yue", FOO_GRAPH_TABLE)?;
    /// assert!(resources.path().join("yue.json").is_file());
    /// assert!(resources.path().join("yue.bib").is_file());
    /// # Ok::<(), std::io::Error>(())
    /// ```
    #[derive(Debug)]
    pub struct ResourceDir {
        dir: TempDir,
    }

    impl ResourceDir {
        /// Creates an empty resource directory.
        ///
        /// # Errors
        /// Returns any error raised while creating the temporary directory.
        pub fn new() -> io::Result<Self> {
            Ok(Self {
                dir: TempDir::new()?,
            })
        }

        /// Creates a directory holding `table` and [`FIXTURE_CITATION`] for
        /// the repository whose resource stem is `stem`.
        ///
        /// # Errors
        /// Returns any error raised while writing the files.
        pub fn with_repository(stem: &str, table: &str) -> io::Result<Self> {
            let resources = Self::new()?;
            resources.write_table(stem, table)?;
            resources.write_citation(stem, FIXTURE_CITATION)?;
            Ok(resources)
        }

        /// Returns the directory root.
        #[must_use]
        pub fn path(&self) -> &Path {
            self.dir.path()
        }

        /// Writes `<stem>.json`.
        ///
        /// # Errors
        /// Returns any error raised while writing the file.
        pub fn write_table(&self, stem: &str, table: &str) -> io::Result<PathBuf> {
            self.write(&format!("{stem}.json"), table)
        }

        /// Writes `<stem>.bib`.
        ///
        /// # Errors
        /// Returns any error raised while writing the file.
        pub fn write_citation(&self, stem: &str, citation: &str) -> io::Result<PathBuf> {
            self.write(&format!("{stem}.bib"), citation)
        }

        fn write(&self, file_name: &str, contents: &str) -> io::Result<PathBuf> {
            let path = self.dir.path().join(file_name);
            fs::write(&path, contents)?;
            Ok(path)
        }
    }
}

pub mod tracing {
    //! Capture of tracing events and spans for assertions in tests.

    use std::{
        collections::BTreeMap,
        fmt,
        sync::{Arc, Mutex, PoisonError},
    };

    use tracing::{
        Event, Level, Subscriber,
        field::{Field, Visit},
        span,
    };
    use tracing_subscriber::{Layer, layer::Context, prelude::*, registry::LookupSpan};

    /// An event observed by an [`EventRecorder`].
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct RecordedEvent {
        /// Level the event was emitted at.
        pub level: Level,
        /// Target of the event, usually the emitting module path.
        pub target: String,
        /// The event message, empty when the event had none.
        pub message: String,
        /// Remaining structured fields rendered as strings.
        pub fields: BTreeMap<String, String>,
    }

    /// Layer that stores every event and the name of every span it sees.
    #[derive(Clone, Debug, Default)]
    pub struct EventRecorder {
        events: Arc<Mutex<Vec<RecordedEvent>>>,
        spans: Arc<Mutex<Vec<String>>>,
    }

    impl EventRecorder {
        /// Returns the recorded events in emission order.
        #[must_use]
        pub fn events(&self) -> Vec<RecordedEvent> {
            self.events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Returns the names of the spans created so far, in creation order.
        #[must_use]
        pub fn span_names(&self) -> Vec<String> {
            self.spans
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Returns the messages of events recorded at `level`.
        #[must_use]
        pub fn messages_at(&self, level: Level) -> Vec<String> {
            self.events()
                .into_iter()
                .filter(|event| event.level == level)
                .map(|event| event.message)
                .collect()
        }
    }

    impl<S> Layer<S> for EventRecorder
    where
        S: Subscriber + for<'span> LookupSpan<'span>,
    {
        fn on_new_span(&self, attrs: &span::Attributes<'_>, _id: &span::Id, _ctx: Context<'_, S>) {
            self.spans
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(attrs.metadata().name().to_owned());
        }

        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut visitor = FieldCollector::default();
            event.record(&mut visitor);
            self.events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(RecordedEvent {
                    level: *event.metadata().level(),
                    target: event.metadata().target().to_owned(),
                    message: visitor.message,
                    fields: visitor.fields,
                });
        }
    }

    #[derive(Default)]
    struct FieldCollector {
        message: String,
        fields: BTreeMap<String, String>,
    }

    impl Visit for FieldCollector {
        fn record_str(&mut self, field: &Field, value: &str) {
            if field.name() == "message" {
                value.clone_into(&mut self.message);
            } else {
                self.fields
                    .insert(field.name().to_owned(), value.to_owned());
            }
        }

        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            let rendered = format!("{value:?}");
            if field.name() == "message" {
                self.message = rendered;
            } else {
                self.fields.insert(field.name().to_owned(), rendered);
            }
        }
    }

    /// Runs `body` with an [`EventRecorder`] installed as the thread's
    /// default subscriber and returns its result with the recorder.
    ///
    /// # Examples
    /// ```
    /// use graph_miner_test_support::tracing::capture;
    ///
    /// let (value, recorder) = capture(|| {
    ///     tracing::info!(graph = "Cora", "fetching");
    ///     7
    /// });
    /// assert_eq!(value, 7);
    /// let events = recorder.events();
    /// assert_eq!(events[0].message, "fetching");
    /// assert_eq!(events[0].fields["graph"], "Cora");
    /// ```
    pub fn capture<T>(body: impl FnOnce() -> T) -> (T, EventRecorder) {
        let recorder = EventRecorder::default();
        let subscriber = tracing_subscriber::registry().with(recorder.clone());
        let value = tracing::subscriber::with_default(subscriber, body);
        (value, recorder)
    }
}
