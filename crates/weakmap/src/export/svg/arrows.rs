//! Arrow markers and edge paths.

use svg::node::element::{Definitions, Marker, Path};

use weakmap_core::color::Color;

use crate::map::MapEdge;

/// The marker id used for arrows drawn in `color`.
pub fn marker_id(color: Color) -> String {
    format!("arrow-{}", color.to_id_safe_string())
}

/// Creates the arrow-head marker definition for `color`.
pub fn create_marker_definitions(color: Color) -> Definitions {
    let marker = Marker::new()
        .set("id", marker_id(color))
        .set("viewBox", "0 0 6 6")
        .set("refX", 6)
        .set("refY", 3)
        .set("markerWidth", 6)
        .set("markerHeight", 6)
        .set("orient", "auto")
        .add(
            Path::new()
                .set("d", "M 0 0 L 0 6 L 6 3 z")
                .set("fill", color)
                .set("fill-opacity", color.alpha()),
        );

    Definitions::new().add(marker)
}

/// Path data for the cubic Bézier of `edge`.
pub fn curve_path_data(edge: &MapEdge<'_>) -> String {
    let (start, end) = (edge.start(), edge.end());
    let (ctrl1, ctrl2) = edge.control_points();
    format!(
        "M {} {} C {} {}, {} {}, {} {}",
        start.x(),
        start.y(),
        ctrl1.x(),
        ctrl1.y(),
        ctrl2.x(),
        ctrl2.y(),
        end.x(),
        end.y()
    )
}

/// Creates the drawn path of `edge` ending in the arrow marker for `color`.
pub fn create_edge_path(edge: &MapEdge<'_>, color: Color) -> Path {
    Path::new()
        .set("d", curve_path_data(edge))
        .set("fill", "none")
        .set("stroke", color)
        .set("stroke-width", 1.5)
        .set("marker-end", format!("url(#{})", marker_id(color)))
        .set("data-from", edge.from().id().to_string())
        .set("data-to", edge.to().id().to_string())
}

#[cfg(test)]
mod tests {
    use weakmap_core::topic::Topic;

    use super::*;
    use crate::{config::AppConfig, map::WeaknessMap};

    #[test]
    fn test_curve_path_data() {
        let topics = vec![
            Topic::new("a", "A"),
            Topic::new("b", "B").with_prerequisites(["a"]),
        ];
        let map = WeaknessMap::build(&topics, &AppConfig::default());
        let edge = map.edges().next().unwrap();

        assert_eq!(curve_path_data(&edge), "M 186 44 C 231 44, 231 44, 276 44");
    }

    #[test]
    fn test_marker_id_is_id_safe() {
        let id = marker_id(Color::new("#94a3b8").unwrap());
        assert!(id.starts_with("arrow-"));
        assert!(!id.contains('#'));
    }
}
