use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::config::PanelSize;

/// Fixed coordinate table for one physical panel.
///
/// The two panels do not share a geometry model: every offset is a
/// per-size lookup, never derived from width/height at render time.
#[derive(Debug)]
pub struct Layout {
    pub width: u32,
    pub height: u32,

    // shared header
    pub message_anchor: Point, // one-shot message, right aligned
    pub date: Point,
    pub weekday_right_x: i32,
    pub desc_right_x: i32,
    pub desc_y: i32,
    pub temp_label: Point,
    pub temp_value: Point,
    pub icon: Point,
    pub icon_scale: u32,
    pub feels_label: Point,
    pub feels_value: Point,
    pub pressure_gap: i32, // x gap between feels-like value and pressure label

    // forecast columns
    pub columns: usize,
    pub column_w: i32,
    pub column_icon_y: i32,
    pub column_icon_scale: u32,
    pub column_desc_y: i32,
    pub column_time_y: i32,

    // alert block
    pub alert_event: Point,
    pub alert_meta: Point,
    pub alert_body: Point,

    // graph overlays
    pub graph: Rectangle,
    pub pressure_graph: Rectangle,
    pub rain_graph: Rectangle,
    pub legend_y: i32,
    pub legend_pressure_shift: i32,
    pub note_anchor: Point, // truncation annotation, bottom right

    // sunrise/sunset + day curve
    pub sun_icon_y: i32,
    pub sun_icon_scale: u32,
    pub sun_label_y: i32,
    pub sun_time_y: i32,
    pub curve_graph: Rectangle,
}

/// 5.7" Impression, 600x448.
static SMALL: Layout = Layout {
    width: 600,
    height: 448,
    message_anchor: Point::new(590, 2),
    date: Point::new(15, 5),
    weekday_right_x: 592,
    desc_right_x: 592,
    desc_y: 75,
    temp_label: Point::new(25, 75),
    temp_value: Point::new(30, 95),
    icon: Point::new(440, 85),
    icon_scale: 5,
    feels_label: Point::new(25, 215),
    feels_value: Point::new(30, 240),
    pressure_gap: 85,
    columns: 4,
    column_w: 150,
    column_icon_y: 300,
    column_icon_scale: 3,
    column_desc_y: 400,
    column_time_y: 424,
    alert_event: Point::new(15, 252),
    alert_meta: Point::new(15, 278),
    alert_body: Point::new(15, 298),
    graph: Rectangle::new(Point::new(30, 250), Size::new(540, 160)),
    pressure_graph: Rectangle::new(Point::new(30, 270), Size::new(540, 140)),
    rain_graph: Rectangle::new(Point::new(30, 265), Size::new(540, 150)),
    legend_y: 424,
    legend_pressure_shift: 135,
    note_anchor: Point::new(590, 434),
    sun_icon_y: 130,
    sun_icon_scale: 4,
    sun_label_y: 280,
    sun_time_y: 304,
    curve_graph: Rectangle::new(Point::new(30, 260), Size::new(540, 140)),
};

/// 7.3" Impression, 800x480.
static LARGE: Layout = Layout {
    width: 800,
    height: 480,
    message_anchor: Point::new(790, 2),
    date: Point::new(15, 5),
    weekday_right_x: 792,
    desc_right_x: 792,
    desc_y: 75,
    temp_label: Point::new(25, 75),
    temp_value: Point::new(30, 95),
    icon: Point::new(600, 85),
    icon_scale: 6,
    feels_label: Point::new(25, 215),
    feels_value: Point::new(30, 240),
    pressure_gap: 95,
    columns: 4,
    column_w: 200,
    column_icon_y: 310,
    column_icon_scale: 4,
    column_desc_y: 424,
    column_time_y: 450,
    alert_event: Point::new(15, 252),
    alert_meta: Point::new(15, 278),
    alert_body: Point::new(15, 298),
    graph: Rectangle::new(Point::new(40, 260), Size::new(720, 170)),
    pressure_graph: Rectangle::new(Point::new(40, 282), Size::new(720, 148)),
    rain_graph: Rectangle::new(Point::new(40, 276), Size::new(720, 158)),
    legend_y: 452,
    legend_pressure_shift: 135,
    note_anchor: Point::new(790, 464),
    sun_icon_y: 140,
    sun_icon_scale: 5,
    sun_label_y: 300,
    sun_time_y: 324,
    curve_graph: Rectangle::new(Point::new(40, 272), Size::new(720, 150)),
};

impl Layout {
    pub fn for_panel(size: PanelSize) -> &'static Layout {
        match size {
            PanelSize::Small => &SMALL,
            PanelSize::Large => &LARGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_geometry() {
        let s = Layout::for_panel(PanelSize::Small);
        assert_eq!((s.width, s.height), (600, 448));
        assert_eq!(s.icon.x, 440);

        let l = Layout::for_panel(PanelSize::Large);
        assert_eq!((l.width, l.height), (800, 480));
        assert_eq!(l.icon.x, 600);
    }

    #[test]
    fn regions_stay_on_canvas() {
        for layout in [Layout::for_panel(PanelSize::Small), Layout::for_panel(PanelSize::Large)] {
            for r in [&layout.graph, &layout.pressure_graph, &layout.rain_graph, &layout.curve_graph] {
                let br = r.top_left + r.size;
                assert!(br.x <= layout.width as i32);
                assert!(br.y <= layout.height as i32);
            }
        }
    }
}
