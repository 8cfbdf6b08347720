//! Tests for alert layer definitions and tile URL expansion.

use alert_common::{AlertError, AlertLayer, TileCoord};

#[test]
fn test_integrated_alerts_tile_url() {
    let layer = AlertLayer::integrated_alerts();
    let url = layer.tile_url(&TileCoord::new(5, 10, 12)).unwrap();
    assert_eq!(
        url,
        "https://tiles.globalforestwatch.org/gfw_integrated_alerts/latest/default/5/10/12.png"
    );
}

#[test]
fn test_preset_zoom_range() {
    for layer in [AlertLayer::integrated_alerts(), AlertLayer::glad_alerts()] {
        assert_eq!(layer.tile_size, 256);
        assert!(!layer.supports_zoom(2));
        assert!(layer.supports_zoom(3));
        assert!(layer.supports_zoom(12));
        assert!(!layer.supports_zoom(13));
    }
}

#[test]
fn test_tile_url_rejects_zoom_outside_range() {
    let layer = AlertLayer::glad_alerts();
    let err = layer.tile_url(&TileCoord::new(13, 0, 0)).unwrap_err();
    assert!(matches!(err, AlertError::UnsupportedZoom { zoom: 13, min: 3, max: 12 }));
    assert!(err.is_caller_error());
}

#[test]
fn test_tile_url_rejects_coordinate_off_grid() {
    let layer = AlertLayer::integrated_alerts();
    let err = layer.tile_url(&TileCoord::new(3, 8, 0)).unwrap_err();
    assert!(matches!(err, AlertError::InvalidTile(_)));
}

#[test]
fn test_layer_deserializes_from_json() {
    let layer: AlertLayer = serde_json::from_str(
        r#"{
            "id": "custom",
            "url_template": "file:///tiles/{z}/{x}/{y}.png",
            "tile_size": 512,
            "min_zoom": 0,
            "max_zoom": 4
        }"#,
    )
    .unwrap();
    assert_eq!(layer.id.to_string(), "custom");
    assert_eq!(layer.tile_url(&TileCoord::new(1, 1, 0)).unwrap(), "file:///tiles/1/1/0.png");
}
