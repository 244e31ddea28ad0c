use serde_json::json;

use crate::{
    domain::{Point, PolygonId, Position, Vertices},
    error::{HostError, ProtocolError},
    protocol::{
        CommandResponse, DragPayload, ErrorPayload, EventName, HostEvent, PolygonCommand,
        PositionPayload, WheelPayload,
    },
};

#[test]
fn parses_every_known_event_name() {
    for name in EventName::ALL {
        let parsed: EventName = name.as_str().parse().expect("known event name");
        assert_eq!(parsed, name);
    }
}

#[test]
fn unknown_event_name_lists_available_events() {
    let err = "Hover".parse::<EventName>().expect_err("unknown name");
    assert!(matches!(err, ProtocolError::UnknownEvent { ref name, .. } if name == "Hover"));
    assert_eq!(
        err.to_string(),
        "Event [Hover] does not exist. Available event: LeftClick, DoubleClick, RightClick, Drag, MouseMove, Wheel, Error"
    );
}

#[test]
fn event_names_are_case_sensitive() {
    assert!("leftclick".parse::<EventName>().is_err());
    assert!("LEFT_CLICK".parse::<EventName>().is_err());
}

#[test]
fn channel_suffixes_are_screaming_snake_case() {
    let suffixes: Vec<_> = EventName::ALL
        .iter()
        .map(|name| name.channel_suffix())
        .collect();
    assert_eq!(
        suffixes,
        vec![
            "LEFT_CLICK",
            "DOUBLE_CLICK",
            "RIGHT_CLICK",
            "DRAG",
            "MOUSE_MOVE",
            "WHEEL",
            "ERROR"
        ]
    );
}

#[test]
fn vertices_require_three_points() {
    let err = Vertices::try_from(vec![Point(0.0, 0.0), Point(1.0, 0.0)]).expect_err("two points");
    assert!(matches!(err, ProtocolError::PointsNotEnough(2)));
    assert_eq!(err.to_string(), "At least 3 points needed but got 2.");

    let triangle = Vertices::try_from(vec![Point(0.0, 0.0), Point(1.0, 0.0), Point(1.0, 1.0)])
        .expect("triangle");
    assert_eq!(triangle.into_inner().len(), 3);
}

#[test]
fn vertices_reject_non_finite_coordinates() {
    let err = Vertices::try_from(vec![
        Point(0.0, 0.0),
        Point(f64::NAN, 0.0),
        Point(1.0, f64::INFINITY),
    ])
    .expect_err("nan vertex");
    assert!(matches!(err, ProtocolError::NonFinitePoint(1)));
}

#[test]
fn update_args_keep_point_order_as_pairs() {
    let points = Vertices::try_from(vec![Point(0.5, 0.0), Point(0.0, 0.0), Point(1.0, 1.0)])
        .expect("triangle");
    let cmd = PolygonCommand::Update {
        id: PolygonId::from("p1"),
        points,
    };
    assert_eq!(cmd.name(), "update");
    assert_eq!(
        cmd.args(),
        json!({ "id": "p1", "points": [[0.5, 0.0], [0.0, 0.0], [1.0, 1.0]] })
    );
}

#[test]
fn command_args_match_host_contract() {
    assert_eq!(
        PolygonCommand::Register { id: "a".into() }.args(),
        json!({ "id": "a" })
    );
    assert_eq!(
        PolygonCommand::RegisterAll {
            ids: vec!["a".into(), "b".into()]
        }
        .args(),
        json!({ "id": ["a", "b"] })
    );
    assert_eq!(PolygonCommand::Clear.args(), json!({}));
    assert_eq!(PolygonCommand::Clear.name(), "clear");
}

#[test]
fn decodes_commands_on_host_side() {
    let cmd = PolygonCommand::decode("register_all", json!({ "id": ["a", "b"] })).expect("decode");
    assert_eq!(
        cmd,
        PolygonCommand::RegisterAll {
            ids: vec!["a".into(), "b".into()]
        }
    );

    let err = PolygonCommand::decode("update", json!({ "id": "a", "points": [[0, 0]] }))
        .expect_err("too few points");
    assert_eq!(err, HostError::PointsNotEnough(1));

    let err = PolygonCommand::decode("resize", json!({})).expect_err("unknown command");
    assert_eq!(err, HostError::UnknownCommand("resize".into()));

    let err = PolygonCommand::decode("show", json!({})).expect_err("missing id");
    assert!(matches!(err, HostError::InvalidArguments { ref command, .. } if command == "show"));
}

#[test]
fn success_response_omits_error_field() {
    assert_eq!(
        serde_json::to_value(CommandResponse::success()).expect("encode"),
        json!({ "ok": true })
    );
    let failure: CommandResponse =
        serde_json::from_value(json!({ "ok": false, "error": "boom" })).expect("decode");
    assert_eq!(failure, CommandResponse::failure("boom"));

    let tolerant: CommandResponse =
        serde_json::from_value(json!({ "ok": true, "error": null })).expect("decode null error");
    assert_eq!(tolerant, CommandResponse::success());
}

#[test]
fn host_errors_become_failure_responses() {
    let response = CommandResponse::from(HostError::PolygonNotFound("p1".into()));
    assert!(!response.ok);
    assert_eq!(
        response.error.as_deref(),
        Some("Polygon with id [p1] not found.")
    );
}

#[test]
fn decodes_payload_shape_per_event_name() {
    let click = HostEvent::decode(
        EventName::RightClick,
        json!({ "position": { "x": 1.0, "y": 2.0 } }),
    )
    .expect("click");
    assert_eq!(
        click,
        HostEvent::RightClick(PositionPayload {
            position: Position::new(1.0, 2.0)
        })
    );

    let drag = HostEvent::decode(
        EventName::Drag,
        json!({ "from": { "x": 0.0, "y": 0.0 }, "to": { "x": 3.0, "y": 4.0 } }),
    )
    .expect("drag");
    assert_eq!(
        drag,
        HostEvent::Drag(DragPayload {
            from: Position::new(0.0, 0.0),
            to: Position::new(3.0, 4.0),
        })
    );

    let wheel = HostEvent::decode(EventName::Wheel, json!({ "delta": { "x": 0.0, "y": -1.5 } }))
        .expect("wheel");
    assert_eq!(wheel.name(), EventName::Wheel);

    let error = HostEvent::decode(EventName::Error, json!({ "error": "lost" })).expect("error");
    assert_eq!(
        error,
        HostEvent::Error(ErrorPayload {
            error: "lost".into()
        })
    );
}

#[test]
fn payload_for_other_event_is_rejected() {
    let err = HostEvent::decode(EventName::Drag, json!({ "delta": { "x": 0.0, "y": 1.0 } }))
        .expect_err("wheel payload on drag channel");
    assert!(matches!(
        err,
        ProtocolError::MalformedPayload { event: "Drag", .. }
    ));
}

#[test]
fn payload_value_is_inverse_of_decode() {
    let event = HostEvent::Wheel(WheelPayload {
        delta: Position::new(0.25, -2.0),
    });
    let raw = event.payload_value();
    assert_eq!(raw, json!({ "delta": { "x": 0.25, "y": -2.0 } }));
    assert_eq!(HostEvent::decode(EventName::Wheel, raw).expect("decode"), event);
}
