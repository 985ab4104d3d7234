#[cfg(test)]
mod sim_tests {
    use std::sync::{Arc, Mutex};

    use crate::core::alerts::engine::AlertEngine;
    use crate::core::alerts::filter::{AlertFilterChain, StatusAlertFilter};
    use crate::core::alerts::list_model::{AlertListModel, ListModelEvent, SharedAlertListModel};
    use crate::core::alerts::model::{AlertLevel, AlertNotification, AlertStatus};
    use crate::core::alerts::target::{GeometryAlertTarget, GraphicAlertTarget};
    use crate::core::alerts::triggers::AlertQuery;
    use crate::core::config::{AlertSettings, ConditionConfig, ConfigManager};
    use crate::core::geometry::{Geometry, Point};
    use crate::core::model::Graphic;
    use tempfile::tempdir;

    fn make_engine() -> (AlertEngine, SharedAlertListModel) {
        let registry: SharedAlertListModel = Arc::new(Mutex::new(AlertListModel::new()));
        (AlertEngine::with_registry(registry.clone()), registry)
    }

    fn perimeter() -> Geometry {
        Geometry::Polygon(vec![
            Point::new(-117.20, 34.05),
            Point::new(-117.18, 34.05),
            Point::new(-117.18, 34.07),
            Point::new(-117.20, 34.07),
        ])
    }

    #[test]
    fn simulate_perimeter_breach() {
        let (mut engine, registry) = make_engine();
        let feed = engine.add_feed("Vehicles");
        let target = engine.add_target(Box::new(GeometryAlertTarget::new("Base", vec![perimeter()])));
        let condition = engine.add_condition(AlertLevel::High, "Perimeter", AlertQuery::WithinArea);

        engine.init_with_feed(condition, feed, target);
        assert!(engine.condition_data(condition).is_empty());

        let humvee = engine
            .append_graphic(feed, Graphic::new(Geometry::Point(Point::new(-117.25, 34.06))))
            .unwrap();

        let data = engine.condition_data(condition);
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].name(), "Perimeter (0)");
        let alert = data[0].id();

        // Drive through the perimeter
        for x in [-117.22, -117.19, -117.15] {
            engine.move_source(humvee, Geometry::Point(Point::new(x, 34.06)));
        }

        let notes = engine.drain_notifications();
        assert_eq!(
            notes,
            vec![
                AlertNotification::DataAdded {
                    condition,
                    data: alert
                },
                AlertNotification::DataTriggered { data: alert },
                AlertNotification::StatusChanged {
                    data: alert,
                    status: AlertStatus::Active
                },
                AlertNotification::DataCleared { data: alert },
            ]
        );

        assert_eq!(
            registry.lock().unwrap().take_events(),
            vec![ListModelEvent::Added { row: 0, data: alert }]
        );

        engine.remove_condition(condition);
        assert!(registry.lock().unwrap().is_empty());
    }

    #[test]
    fn simulate_convoy_near_moving_vehicle() {
        let (mut engine, _registry) = make_engine();
        let feed = engine.add_feed("Contacts");
        let own_vehicle = engine.add_target(Box::new(GraphicAlertTarget::new(Graphic::new(Geometry::Point(
            Point::new(0.0, 0.0),
        )))));
        let condition = engine.add_condition(
            AlertLevel::Critical,
            "Contact within 1km",
            AlertQuery::WithinDistance { meters: 1_000.0 },
        );

        engine.append_graphic(feed, Graphic::new(Geometry::Point(Point::new(0.0, 0.05))));
        engine.append_graphic(feed, Graphic::new(Geometry::Point(Point::new(0.05, 0.0))));
        engine.init_with_feed(condition, feed, own_vehicle);
        assert!(engine.triggered_alerts(&AlertFilterChain::new()).is_empty());

        // Own vehicle drives north towards the first contact (~5.5 km away)
        engine.move_target(own_vehicle, Geometry::Point(Point::new(0.0, 0.045)));
        let triggered = engine.triggered_alerts(&AlertFilterChain::new());
        assert_eq!(triggered.len(), 1);
        assert_eq!(triggered[0].name(), "Contact within 1km (0)");

        // Operator closes it; a hide-done chain no longer surfaces it
        let id = triggered[0].id();
        assert!(engine.dismiss(id));
        let chain = AlertFilterChain::new().with(StatusAlertFilter::hiding(&[AlertStatus::Done]));
        assert!(engine.triggered_alerts(&chain).is_empty());
    }

    #[test]
    fn simulate_conditions_from_settings() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new(dir.path().to_path_buf());
        manager
            .save(&AlertSettings {
                conditions: vec![
                    ConditionConfig {
                        name: "Base perimeter".to_string(),
                        level: AlertLevel::High,
                        query: AlertQuery::WithinArea,
                        feed: "Vehicles".to_string(),
                        target: vec![perimeter()],
                        enabled: true,
                    },
                    ConditionConfig {
                        name: "Radar feed".to_string(),
                        level: AlertLevel::Low,
                        query: AlertQuery::WithinArea,
                        feed: "Radar".to_string(),
                        target: vec![perimeter()],
                        enabled: true,
                    },
                    ConditionConfig {
                        name: "Disabled".to_string(),
                        level: AlertLevel::Low,
                        query: AlertQuery::WithinArea,
                        feed: "Vehicles".to_string(),
                        target: Vec::new(),
                        enabled: false,
                    },
                ],
            })
            .unwrap();

        let (mut engine, registry) = make_engine();
        let feed = engine.add_feed("Vehicles");
        engine.append_graphic(feed, Graphic::new(Geometry::Point(Point::new(-117.19, 34.06))));

        let created = engine.load_conditions(&manager.load());
        assert_eq!(created.len(), 2);

        let base = engine.condition_data(created[0]);
        assert_eq!(base.len(), 1);
        assert!(base[0].is_triggered());
        assert_eq!(base[0].name(), "Base perimeter (0)");

        // Unknown feed: the condition exists but never produces data
        assert!(engine.condition_data(created[1]).is_empty());
        assert_eq!(registry.lock().unwrap().len(), 1);
    }
}
