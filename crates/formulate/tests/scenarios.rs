//! Snapshot tests for end-to-end translations.
//!
//! Run `cargo insta review` to update snapshots after intentional changes.

use formulate::{
    Dialect, LowerOptions, PowerStyle, RenderOptions, from_numexpr, from_root, from_ttreeformula,
};

// ============================================================================
// Reference scenarios
// ============================================================================

#[test]
fn numexpr_addition_to_root() {
    let expr = from_numexpr("1 + 1").unwrap();
    insta::assert_snapshot!(expr, @"Add(Literal(1), Literal(1))");
    insta::assert_snapshot!(expr.to_root().unwrap(), @"1 + 1");
}

#[test]
fn root_sqrt_to_numexpr() {
    let expr = from_root("TMath::Sqrt(4)").unwrap();
    insta::assert_snapshot!(expr, @"Sqrt(Literal(4))");
    insta::assert_snapshot!(expr.to_numexpr().unwrap(), @"sqrt(4)");
}

#[test]
fn power_is_right_associative() {
    let expr = from_numexpr("a**b**c").unwrap();
    insta::assert_snapshot!(expr, @"Pow(Symbol(a), Pow(Symbol(b), Symbol(c)))");
    insta::assert_snapshot!(expr.to_numexpr().unwrap(), @"a**(b**c)");
}

#[test]
fn logical_mix_is_grouped() {
    let expr = from_root("A && B || C").unwrap();
    insta::assert_snapshot!(expr, @"Or(And(Symbol(A), Symbol(B)), Symbol(C))");
    insta::assert_snapshot!(expr.to_numexpr().unwrap(), @"(A & B) | C");
}

#[test]
fn indexing_depends_on_dialect() {
    let err = from_numexpr("arr[0]").unwrap_err();
    insta::assert_snapshot!(err, @"syntax error at 3: unexpected `[`");

    let expr = from_root("arr[0]").unwrap();
    insta::assert_snapshot!(expr.to_root().unwrap(), @"arr[0]");
    let expr = from_ttreeformula("arr[0]").unwrap();
    insta::assert_snapshot!(expr.to_root().unwrap(), @"arr[0]");
}

#[test]
fn root_caret_is_power() {
    let expr = from_root("a^b").unwrap();
    insta::assert_snapshot!(expr, @"Pow(Symbol(a), Symbol(b))");
    insta::assert_snapshot!(expr.to_numexpr().unwrap(), @"a**b");
}

// ============================================================================
// Python output
// ============================================================================

#[test]
fn ttreeformula_selection_to_python() {
    let expr = from_ttreeformula("TMath::Sqrt(x) > 2 && Sum$(pt) < 100").unwrap();
    insta::assert_snapshot!(
        expr.to_python().unwrap(),
        @"np.sqrt(x) > 2 and ak.sum(pt, axis=-1) < 100"
    );
}

#[test]
fn root_bitwise_to_python() {
    let expr = from_root("(flags & 4) == 4 || !veto").unwrap();
    insta::assert_snapshot!(
        expr.to_python().unwrap(),
        @"np.bitwise_and(flags, 4) == 4 or not veto"
    );
}

#[test]
fn multi_output_to_python() {
    let expr = from_ttreeformula("jet_pt[0]:TMath::Abs(jet_eta[0])").unwrap();
    insta::assert_snapshot!(expr.to_python().unwrap(), @"jet_pt[:, 0], np.abs(jet_eta[:, 0])");
}

#[test]
fn constants_per_dialect() {
    let expr = from_root("2 * TMath::Pi() * r").unwrap();
    insta::assert_snapshot!(expr.to_root().unwrap(), @"2 * TMath::Pi() * r");
    insta::assert_snapshot!(expr.to_numexpr().unwrap(), @"2 * 3.141592653589793 * r");
    insta::assert_snapshot!(expr.to_python().unwrap(), @"2 * np.pi * r");
}

// ============================================================================
// Options
// ============================================================================

#[test]
fn power_style_option() {
    let expr = from_numexpr("(x - 1)**2").unwrap();
    insta::assert_snapshot!(expr.to_root().unwrap(), @"TMath::Power(x - 1, 2)");

    let caret = RenderOptions {
        power: PowerStyle::Caret,
        ..RenderOptions::default()
    };
    insta::assert_snapshot!(expr.render(Dialect::Root, &caret).unwrap(), @"(x - 1)^2");
}

#[test]
fn keep_groups_option() {
    let options = LowerOptions {
        keep_groups: true,
        ..LowerOptions::default()
    };
    let expr = formulate::parse(Dialect::Root, "((a)) * (b + c)", &options, None).unwrap();
    insta::assert_snapshot!(expr, @"Mul(Slice(Slice(Symbol(a))), Slice(Add(Symbol(b), Symbol(c))))");
    insta::assert_snapshot!(expr.to_root().unwrap(), @"((a)) * (b + c)");
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn arity_error() {
    let err = from_root("TMath::Sqrt(1, 2)").unwrap_err();
    insta::assert_snapshot!(err, @"`TMath::Sqrt` takes 1 argument(s), got 2 at 0");
}

#[test]
fn unknown_namespace_error() {
    let err = from_root("x + Foo::Sqrt(x)").unwrap_err();
    insta::assert_snapshot!(err, @"unknown namespace `Foo::Sqrt` in root at 4");
}

#[test]
fn unsupported_in_target() {
    let expr = from_numexpr("a ^ b").unwrap();
    insta::assert_snapshot!(expr.to_root().unwrap_err(), @"BitXor is not supported in root");

    let expr = from_ttreeformula("Length$(x)").unwrap();
    insta::assert_snapshot!(expr.to_numexpr().unwrap_err(), @"Length is not supported in numexpr");
}

#[test]
fn free_variables() {
    let expr = from_root("TMath::Hypot(px, py) / e + px").unwrap();
    let names: Vec<_> = expr.free_variables().into_iter().collect();
    insta::assert_snapshot!(names.join(","), @"e,px,py");
}
