use crobots_parser::{parse_expression, parse_program};
use insta::assert_snapshot;

fn expr_display(source: &str) -> String {
    let (expr, diagnostics) = parse_expression(source);
    assert!(diagnostics.is_empty(), "unexpected: {diagnostics:?}");
    expr.unwrap().to_string()
}

#[test]
fn expression_roundtrips_through_display() {
    assert_snapshot!(expr_display("1 + 2 * 3"), @"1 + 2 * 3");
    assert_snapshot!(
        expr_display("scan(i, 2) < 700 && damage() > 50"),
        @"scan(i, 2) < 700 && damage() > 50"
    );
    assert_snapshot!(expr_display("o += q = p *= 2"), @"o += q = p *= 2");
    assert_snapshot!(expr_display("-x % !y"), @"-x % !y");
}

#[test]
fn increment_displays_as_its_desugaring() {
    assert_snapshot!(expr_display("++course"), @"course += 1");
}

#[test]
fn full_robot_program_parses_cleanly() {
    let source = r#"
/** distance to the point (x,y) */
distance(x1, y1, x2, y2) {
    return sqrt((x1 - x2) * (x1 - x2) + (y1 - y2) * (y1 - y2));
}

int course;

main() {
    int range;
    course = 90;
    while (damage() < 50) {
        range = scan(course, 2);
        if (range > 0 && range <= 700) {
            cannon(course, range);
        } else {
            course = (course + 5) % 360;
        }
        drive(course, 50);
    }
    return 0;
}
"#;
    let (program, diagnostics) = parse_program(source);
    assert!(diagnostics.is_empty(), "unexpected: {diagnostics:?}");
    assert_eq!(program.items.len(), 3);
}
