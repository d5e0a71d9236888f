//! Description composer.

use std::sync::Arc;

use realmlore_domain::{
    common::non_blank, CompiledDescription, DescriptionLayer, LayerPriorityTable, LayerType,
    LocationId, Provenance, ProvenanceEntry, ViewContext,
};

use super::masking::SupersedeMask;
use crate::infrastructure::ports::{
    ClockPort, LayerRepo, MarkupRendererPort, RenderError, RepoError, TelemetryEvent,
    TelemetryPort,
};

/// Separator between composed sections and between concatenated base layers.
const SECTION_SEPARATOR: &str = "\n\n";

/// Assembles a location's final description from its layers.
///
/// Composition is deterministic: the same layers and context always produce
/// the same text, markup, and provenance (apart from `compiled_at`).
///
/// ## Algorithm
///
/// 1. Root text: the newest hero-prose layer if any (base layers are then
///    ignored), otherwise every base layer joined oldest first, otherwise the
///    caller's fallback text.
/// 2. Dynamic layers are always active. Ambient layers are active when each
///    weather/time attribute they declare matches the view context; unset
///    context labels match anything.
/// 3. Sentences of the root text containing a `supersedes` fragment from an
///    active dynamic layer are dropped.
/// 4. Active layers follow the root, ordered by type priority, then the
///    layer's own priority (both descending), then id.
pub struct DescriptionComposer {
    layers: Arc<dyn LayerRepo>,
    renderer: Arc<dyn MarkupRendererPort>,
    telemetry: Arc<dyn TelemetryPort>,
    clock: Arc<dyn ClockPort>,
    priorities: LayerPriorityTable,
}

impl DescriptionComposer {
    pub fn new(
        layers: Arc<dyn LayerRepo>,
        renderer: Arc<dyn MarkupRendererPort>,
        telemetry: Arc<dyn TelemetryPort>,
        clock: Arc<dyn ClockPort>,
        priorities: LayerPriorityTable,
    ) -> Self {
        Self {
            layers,
            renderer,
            telemetry,
            clock,
            priorities,
        }
    }

    /// Compose the current description for a location.
    ///
    /// Store failures propagate unchanged; everything else degrades to a
    /// best-effort result.
    pub async fn compile(
        &self,
        location_id: LocationId,
        context: ViewContext,
        fallback_base: Option<&str>,
    ) -> Result<CompiledDescription, RepoError> {
        let layers = self.layers.list_for_location(location_id).await?;
        Ok(self.compose(location_id, &layers, context, fallback_base))
    }

    /// Compose from an explicit layer set. Never fails.
    pub fn compose(
        &self,
        location_id: LocationId,
        layers: &[DescriptionLayer],
        context: ViewContext,
        fallback_base: Option<&str>,
    ) -> CompiledDescription {
        let fallback_base = fallback_base.and_then(non_blank);
        if layers.is_empty() && fallback_base.is_none() {
            self.record_compiled(location_id, 0, 0, false);
            return CompiledDescription::empty(location_id, context, self.clock.now());
        }

        let hero = layers
            .iter()
            .filter(|layer| layer.is_hero_prose())
            .max_by(|a, b| a.authored_at.cmp(&b.authored_at).then(a.id.cmp(&b.id)));

        let (root_layers, root_text) = match hero {
            Some(hero) => (vec![hero], hero.value.trim().to_string()),
            None => {
                let mut bases: Vec<&DescriptionLayer> = layers
                    .iter()
                    .filter(|layer| layer.layer_type == LayerType::Base)
                    .collect();
                bases.sort_by(|a, b| a.authored_at.cmp(&b.authored_at).then(a.id.cmp(&b.id)));
                let joined = bases
                    .iter()
                    .filter_map(|layer| non_blank(&layer.value))
                    .collect::<Vec<_>>()
                    .join(SECTION_SEPARATOR);
                let text = if joined.is_empty() {
                    fallback_base.unwrap_or_default().to_string()
                } else {
                    joined
                };
                (bases, text)
            }
        };

        let mut active: Vec<&DescriptionLayer> = layers
            .iter()
            .filter(|layer| match layer.layer_type {
                LayerType::Base => false,
                LayerType::Dynamic => !layer.is_hero_prose(),
                LayerType::Ambient => ambient_matches(layer, &context),
            })
            .collect();

        let mask = SupersedeMask::new(
            active
                .iter()
                .copied()
                .filter(|layer| layer.layer_type == LayerType::Dynamic)
                .flat_map(|layer| layer.attributes.supersedes.iter().map(String::as_str)),
        );
        let masked_root = mask.apply(&root_text);

        active.sort_by(|a, b| {
            let a_type = self.priorities.priority_of(a.layer_type);
            let b_type = self.priorities.priority_of(b.layer_type);
            b_type
                .cmp(&a_type)
                .then(b.priority.cmp(&a.priority))
                .then(a.id.cmp(&b.id))
        });

        let text = std::iter::once(masked_root.text.as_str())
            .chain(active.iter().map(|layer| layer.value.as_str()))
            .filter_map(non_blank)
            .collect::<Vec<_>>()
            .join(SECTION_SEPARATOR)
            .trim()
            .to_string();

        let html = if text.is_empty() {
            String::new()
        } else {
            self.render(location_id, &text)
        };

        let entries = root_layers
            .iter()
            .map(|layer| provenance_entry(layer, mask.hits(&layer.value)))
            .chain(active.iter().map(|layer| provenance_entry(layer, false)))
            .collect::<Vec<_>>();

        self.record_compiled(
            location_id,
            entries.len(),
            masked_root.removed_sentences,
            hero.is_some(),
        );

        CompiledDescription {
            text,
            html,
            provenance: Provenance {
                location_id,
                layers: entries,
                context,
                compiled_at: self.clock.now(),
            },
        }
    }

    /// Render markup, falling back to the raw text on any failure.
    fn render(&self, location_id: LocationId, text: &str) -> String {
        let error = match self.renderer.render(text) {
            Ok(html) if !html.trim().is_empty() => return html,
            Ok(_) => RenderError::UnexpectedShape("empty markup for non-empty text".into()),
            Err(e) => e,
        };

        tracing::warn!(
            location_id = %location_id,
            error = %error,
            "Markup rendering failed, falling back to plain text"
        );
        self.telemetry.record(
            TelemetryEvent::new(TelemetryEvent::RENDER_FALLBACK)
                .with("location_id", location_id.to_string())
                .with("error", error.to_string()),
        );
        text.to_string()
    }

    fn record_compiled(
        &self,
        location_id: LocationId,
        layer_count: usize,
        superseded_sentences: usize,
        hero: bool,
    ) {
        self.telemetry.record(
            TelemetryEvent::new(TelemetryEvent::DESCRIPTION_COMPILED)
                .with("location_id", location_id.to_string())
                .with("layer_count", layer_count)
                .with("superseded_sentences", superseded_sentences)
                .with("hero", hero),
        );
    }
}

fn ambient_matches(layer: &DescriptionLayer, context: &ViewContext) -> bool {
    fn label_matches(declared: Option<&str>, current: Option<&str>) -> bool {
        match (declared, current) {
            (Some(declared), Some(current)) => declared == current,
            _ => true,
        }
    }

    label_matches(
        layer.attributes.weather_type.as_deref(),
        context.weather.as_deref(),
    ) && label_matches(
        layer.attributes.time_bucket.as_deref(),
        context.time.as_deref(),
    )
}

fn provenance_entry(layer: &DescriptionLayer, superseded: bool) -> ProvenanceEntry {
    ProvenanceEntry {
        layer_id: layer.id,
        layer_type: layer.layer_type,
        priority: layer.priority,
        authored_at: layer.authored_at,
        superseded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::markup::ParagraphMarkupRenderer;
    use crate::infrastructure::ports::{MockLayerRepo, MockMarkupRendererPort, MockTelemetryPort};
    use crate::infrastructure::telemetry::NoopTelemetry;
    use chrono::{DateTime, TimeZone, Utc};
    use realmlore_domain::{LayerAttributes, LayerId, LayerMetadata};

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, day, 9, 30, 0).unwrap()
    }

    fn composer_with(
        layers: MockLayerRepo,
        renderer: Arc<dyn MarkupRendererPort>,
        telemetry: Arc<dyn TelemetryPort>,
    ) -> DescriptionComposer {
        DescriptionComposer::new(
            Arc::new(layers),
            renderer,
            telemetry,
            Arc::new(FixedClock(at(20))),
            LayerPriorityTable::STANDARD,
        )
    }

    fn composer() -> DescriptionComposer {
        composer_with(
            MockLayerRepo::new(),
            Arc::new(ParagraphMarkupRenderer::new()),
            Arc::new(NoopTelemetry),
        )
    }

    fn base(location: LocationId, value: &str, day: u32) -> DescriptionLayer {
        DescriptionLayer::new(location, LayerType::Base, value, at(day))
    }

    fn dynamic(location: LocationId, value: &str, supersedes: &[&str]) -> DescriptionLayer {
        DescriptionLayer::new(location, LayerType::Dynamic, value, at(5)).with_attributes(
            LayerAttributes {
                supersedes: supersedes.iter().map(|s| s.to_string()).collect(),
                ..LayerAttributes::default()
            },
        )
    }

    fn hero(location: LocationId, value: &str, day: u32) -> DescriptionLayer {
        DescriptionLayer::new(location, LayerType::Dynamic, value, at(day))
            .with_metadata(LayerMetadata::hero())
    }

    fn ambient(
        location: LocationId,
        value: &str,
        weather: Option<&str>,
        time: Option<&str>,
    ) -> DescriptionLayer {
        DescriptionLayer::new(location, LayerType::Ambient, value, at(3)).with_attributes(
            LayerAttributes {
                weather_type: weather.map(str::to_string),
                time_bucket: time.map(str::to_string),
                ..LayerAttributes::default()
            },
        )
    }

    #[tokio::test]
    async fn no_layers_and_no_fallback_is_empty() {
        let location = LocationId::new();
        let mut layers = MockLayerRepo::new();
        layers
            .expect_list_for_location()
            .returning(|_| Ok(Vec::new()));
        let mut renderer = MockMarkupRendererPort::new();
        renderer.expect_render().never();

        let composer = composer_with(layers, Arc::new(renderer), Arc::new(NoopTelemetry));
        let compiled = composer
            .compile(location, ViewContext::new(at(20)), None)
            .await
            .unwrap();

        assert_eq!(compiled.text, "");
        assert_eq!(compiled.html, "");
        assert!(compiled.provenance.layers.is_empty());
        assert_eq!(compiled.provenance.location_id, location);
        assert_eq!(compiled.provenance.compiled_at, at(20));
    }

    #[tokio::test]
    async fn store_errors_propagate() {
        let mut layers = MockLayerRepo::new();
        layers
            .expect_list_for_location()
            .returning(|_| Err(RepoError::database("list_for_location", "unavailable")));

        let composer = composer_with(
            layers,
            Arc::new(ParagraphMarkupRenderer::new()),
            Arc::new(NoopTelemetry),
        );
        let err = composer
            .compile(LocationId::new(), ViewContext::new(at(20)), None)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Database { .. }));
    }

    #[test]
    fn fallback_text_used_without_base_layers() {
        let location = LocationId::new();
        let compiled = composer().compose(
            location,
            &[],
            ViewContext::new(at(20)),
            Some("  An empty field.  "),
        );
        assert_eq!(compiled.text, "An empty field.");
        assert_eq!(compiled.html, "<p>An empty field.</p>");
        assert!(compiled.provenance.layers.is_empty());
    }

    #[test]
    fn base_layers_concatenate_oldest_first() {
        let location = LocationId::new();
        let layers = vec![
            base(location, "Torches gutter.", 4),
            base(location, "A stone hall.", 1),
        ];
        let compiled = composer().compose(
            location,
            &layers,
            ViewContext::new(at(20)),
            Some("Unused."),
        );
        assert_eq!(compiled.text, "A stone hall.\n\nTorches gutter.");
        assert_eq!(compiled.provenance.layers[0].layer_id, layers[1].id);
    }

    #[test]
    fn hero_prose_replaces_base() {
        let location = LocationId::new();
        let layers = vec![
            base(location, "A sleepy village.", 1),
            hero(location, "Ash drifts over the razed village.", 2),
        ];
        let compiled = composer().compose(location, &layers, ViewContext::new(at(20)), None);

        assert_eq!(compiled.text, "Ash drifts over the razed village.");
        assert_eq!(compiled.provenance.layers.len(), 1);
        assert_eq!(compiled.provenance.layers[0].layer_id, layers[1].id);
    }

    #[test]
    fn newest_hero_prose_wins() {
        let location = LocationId::new();
        let layers = vec![
            hero(location, "Version from the fifteenth.", 15),
            hero(location, "Version from the tenth.", 10),
        ];
        let compiled = composer().compose(location, &layers, ViewContext::new(at(20)), None);
        assert_eq!(compiled.text, "Version from the fifteenth.");
    }

    #[test]
    fn blank_hero_prose_does_not_replace_base() {
        let location = LocationId::new();
        let layers = vec![base(location, "A quiet inn.", 1), hero(location, "   ", 9)];
        let compiled = composer().compose(location, &layers, ViewContext::new(at(20)), None);
        assert_eq!(compiled.text, "A quiet inn.");
    }

    #[test]
    fn structural_layer_supersedes_base_sentence() {
        let location = LocationId::new();
        let layers = vec![
            base(location, "A plain wooden gate stands.", 1),
            dynamic(location, "The gate is ablaze.", &["plain wooden gate"]),
        ];
        let compiled = composer().compose(location, &layers, ViewContext::new(at(20)), None);

        assert_eq!(compiled.text, "The gate is ablaze.");
        let entries = &compiled.provenance.layers;
        assert_eq!(entries.len(), 2);
        assert!(entries[0].superseded);
        assert_eq!(entries[0].layer_type, LayerType::Base);
        assert!(!entries[1].superseded);
    }

    #[test]
    fn supersede_matches_whole_words_only() {
        let location = LocationId::new();
        let layers = vec![
            base(location, "Guards investigate the tracks.", 1),
            dynamic(location, "Smoke rises.", &["gate"]),
        ];
        let compiled = composer().compose(location, &layers, ViewContext::new(at(20)), None);
        assert_eq!(compiled.text, "Guards investigate the tracks.\n\nSmoke rises.");
        assert!(!compiled.provenance.layers[0].superseded);
    }

    #[test]
    fn ambient_layers_gate_on_weather() {
        let location = LocationId::new();
        let layers = vec![
            base(location, "A market square.", 1),
            ambient(location, "Rain drums on awnings.", Some("rain"), None),
        ];

        let clear = composer().compose(
            location,
            &layers,
            ViewContext::new(at(20)).with_weather("clear"),
            None,
        );
        assert_eq!(clear.text, "A market square.");

        let rain = composer().compose(
            location,
            &layers,
            ViewContext::new(at(20)).with_weather("rain"),
            None,
        );
        assert_eq!(rain.text, "A market square.\n\nRain drums on awnings.");

        let unset = composer().compose(location, &layers, ViewContext::new(at(20)), None);
        assert_eq!(unset.text, rain.text);
    }

    #[test]
    fn ambient_layers_gate_on_time_bucket() {
        let location = LocationId::new();
        let layers = vec![
            ambient(location, "Lanterns glow.", None, Some("night")),
            ambient(location, "Crickets chirp.", None, None),
        ];
        let day = composer().compose(
            location,
            &layers,
            ViewContext::new(at(20)).with_time("day"),
            None,
        );
        assert_eq!(day.text, "Crickets chirp.");
    }

    #[test]
    fn sections_order_by_type_then_priority_then_id() {
        let location = LocationId::new();
        let low_id = LayerId::from_uuid(uuid::Uuid::from_u128(1));
        let high_id = LayerId::from_uuid(uuid::Uuid::from_u128(2));
        let layers = vec![
            ambient(location, "Ambient high priority.", None, None).with_priority(900),
            dynamic(location, "Dynamic low.", &[]).with_priority(1),
            dynamic(location, "Dynamic tie B.", &[]).with_priority(5).with_id(high_id),
            dynamic(location, "Dynamic tie A.", &[]).with_priority(5).with_id(low_id),
            base(location, "Root.", 1),
        ];
        let compiled = composer().compose(location, &layers, ViewContext::new(at(20)), None);

        assert_eq!(
            compiled.text,
            "Root.\n\nDynamic tie A.\n\nDynamic tie B.\n\nDynamic low.\n\nAmbient high priority."
        );
        let priorities: Vec<_> = compiled.provenance.layers.iter().map(|e| e.priority).collect();
        assert_eq!(priorities, vec![0, 5, 5, 1, 900]);
    }

    #[test]
    fn composition_is_deterministic_regardless_of_input_order() {
        let location = LocationId::new();
        let mut layers = vec![
            base(location, "Old walls. A plain wooden gate stands.", 1),
            base(location, "Moss everywhere.", 2),
            dynamic(location, "The gate is ablaze.", &["plain wooden gate"]),
            ambient(location, "Wind.", Some("storm"), None),
            dynamic(location, "Crowds gather.", &[]).with_priority(2),
        ];
        let context = ViewContext::new(at(20)).with_weather("storm");
        let first = composer().compose(location, &layers, context.clone(), None);
        layers.reverse();
        let second = composer().compose(location, &layers, context, None);

        assert_eq!(first, second);
        assert_eq!(
            first.text,
            "Old walls.\n\nMoss everywhere.\n\nCrowds gather.\n\nThe gate is ablaze.\n\nWind."
        );
    }

    #[test]
    fn render_failure_falls_back_to_plain_text() {
        let location = LocationId::new();
        let mut renderer = MockMarkupRendererPort::new();
        renderer
            .expect_render()
            .returning(|_| Err(RenderError::Failed("boom".into())));
        let mut telemetry = MockTelemetryPort::new();
        telemetry
            .expect_record()
            .withf(|event| event.name == TelemetryEvent::RENDER_FALLBACK)
            .times(1)
            .return_const(());
        telemetry
            .expect_record()
            .withf(|event| event.name == TelemetryEvent::DESCRIPTION_COMPILED)
            .times(1)
            .return_const(());

        let composer = composer_with(MockLayerRepo::new(), Arc::new(renderer), Arc::new(telemetry));
        let compiled = composer.compose(
            location,
            &[base(location, "Plain <text>.", 1)],
            ViewContext::new(at(20)),
            None,
        );

        assert_eq!(compiled.text, "Plain <text>.");
        assert_eq!(compiled.html, "Plain <text>.");
    }

    #[test]
    fn empty_markup_is_treated_as_render_failure() {
        let location = LocationId::new();
        let mut renderer = MockMarkupRendererPort::new();
        renderer.expect_render().returning(|_| Ok(String::new()));

        let composer = composer_with(
            MockLayerRepo::new(),
            Arc::new(renderer),
            Arc::new(NoopTelemetry),
        );
        let compiled = composer.compose(
            location,
            &[base(location, "Still here.", 1)],
            ViewContext::new(at(20)),
            None,
        );
        assert_eq!(compiled.html, "Still here.");
    }

    #[test]
    fn fully_masked_root_with_no_sections_skips_rendering() {
        let location = LocationId::new();
        let mut renderer = MockMarkupRendererPort::new();
        renderer.expect_render().never();

        let composer = composer_with(
            MockLayerRepo::new(),
            Arc::new(renderer),
            Arc::new(NoopTelemetry),
        );
        let compiled = composer.compose(
            location,
            &[
                base(location, "The bridge stands.", 1),
                dynamic(location, "", &["bridge"]),
            ],
            ViewContext::new(at(20)),
            None,
        );
        assert_eq!(compiled.text, "");
        assert_eq!(compiled.html, "");
        assert_eq!(compiled.provenance.layers.len(), 2);
    }
}
