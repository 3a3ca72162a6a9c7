mod common;

use common::*;
use tarn_core::{Env, Value};
use tarn_eval::{create_module_env, Interpreter};

#[test]
fn number_literals_self_evaluate() {
    assert_eq!(run(&num(1.0)), num(1.0));
    assert_eq!(run(&num(-2.5)), num(-2.5));
}

#[test]
fn booleans_and_null_self_evaluate() {
    assert_eq!(run(&Value::Bool(true)), Value::Bool(true));
    assert_eq!(run(&Value::Null), Value::Null);
}

#[test]
fn string_literal_strips_delimiters_once() {
    assert_eq!(run(&lit("hello")), Value::string("hello"));
    // Inner quotes survive: only the outer delimiter pair is stripped.
    assert_eq!(
        run(&Value::string("\"\"nested\"\"")),
        Value::string("\"nested\"")
    );
}

#[test]
fn undelimited_string_passes_through() {
    assert_eq!(run(&Value::string("already")), Value::string("already"));
}

#[test]
fn sentinels_and_version_resolve() {
    assert_eq!(run(&sym("true")), Value::Bool(true));
    assert_eq!(run(&sym("false")), Value::Bool(false));
    assert_eq!(run(&sym("null")), Value::Null);
    assert_eq!(run(&sym("VERSION")), Value::string("0.1"));
}

#[test]
fn var_defines_and_returns() {
    let program = begin(vec![var("x", num(10.0)), sym("x")]);
    assert_eq!(run(&program), num(10.0));
}

#[test]
fn var_value_is_evaluated_first() {
    let program = begin(vec![
        var("x", form("+", vec![num(2.0), num(3.0)])),
        sym("x"),
    ]);
    assert_eq!(run(&program), num(5.0));
}

#[test]
fn inner_redefinition_does_not_leak() {
    // (begin (var x 10) (begin (var x 20) x) x) => 10
    let program = begin(vec![
        var("x", num(10.0)),
        begin(vec![var("x", num(20.0)), sym("x")]),
        sym("x"),
    ]);
    assert_eq!(run(&program), num(10.0));
}

#[test]
fn blocks_see_enclosing_bindings() {
    // (begin (var value 10) (var result (begin (var x (+ value 10)) x)) result) => 20
    let program = begin(vec![
        var("value", num(10.0)),
        var(
            "result",
            begin(vec![
                var("x", form("+", vec![sym("value"), num(10.0)])),
                sym("x"),
            ]),
        ),
        sym("result"),
    ]);
    assert_eq!(run(&program), num(20.0));
}

#[test]
fn assignment_climbs_the_chain() {
    // (begin (var data 10) (begin (set data 100)) data) => 100
    let program = begin(vec![
        var("data", num(10.0)),
        begin(vec![set("data", num(100.0))]),
        sym("data"),
    ]);
    assert_eq!(run(&program), num(100.0));
}

#[test]
fn empty_block_yields_null() {
    assert_eq!(run(&begin(vec![])), Value::Null);
}

#[test]
fn if_branches_on_truthiness() {
    let branch = |cond: Value| form("if", vec![cond, num(1.0), num(2.0)]);
    assert_eq!(run(&branch(sym("true"))), num(1.0));
    assert_eq!(run(&branch(sym("false"))), num(2.0));
    assert_eq!(run(&branch(num(0.0))), num(2.0));
    assert_eq!(run(&branch(num(42.0))), num(1.0));
    assert_eq!(run(&branch(lit(""))), num(2.0));
    assert_eq!(run(&branch(lit("x"))), num(1.0));
    assert_eq!(run(&branch(sym("null"))), num(2.0));
}

#[test]
fn while_accumulates() {
    // (begin (var i 0) (var sum 0) (while (< i 10) (begin (set sum (+ sum i)) (++ i))) sum)
    let program = begin(vec![
        var("i", num(0.0)),
        var("sum", num(0.0)),
        form(
            "while",
            vec![
                form("<", vec![sym("i"), num(10.0)]),
                begin(vec![
                    set("sum", form("+", vec![sym("sum"), sym("i")])),
                    form("++", vec![sym("i")]),
                ]),
            ],
        ),
        sym("sum"),
    ]);
    assert_eq!(run(&program), num(45.0));
}

#[test]
fn while_with_zero_iterations_is_null() {
    let program = form("while", vec![sym("false"), num(1.0)]);
    assert_eq!(run(&program), Value::Null);
}

#[test]
fn lambda_applies_positionally() {
    // ((lambda (x y) (+ x y)) 3 4) => 7
    let program = list(vec![
        form(
            "lambda",
            vec![
                list(vec![sym("x"), sym("y")]),
                form("+", vec![sym("x"), sym("y")]),
            ],
        ),
        num(3.0),
        num(4.0),
    ]);
    assert_eq!(run(&program), num(7.0));
}

#[test]
fn missing_arguments_bind_null() {
    let program = list(vec![
        form("lambda", vec![list(vec![sym("x"), sym("y")]), sym("y")]),
        num(1.0),
    ]);
    assert_eq!(run(&program), Value::Null);
}

#[test]
fn extra_arguments_are_ignored() {
    let program = list(vec![
        form("lambda", vec![list(vec![sym("x")]), sym("x")]),
        num(1.0),
        num(2.0),
        num(3.0),
    ]);
    assert_eq!(run(&program), num(1.0));
}

#[test]
fn def_enables_named_recursion() {
    // (begin (def factorial (n) (if (<= n 1) 1 (* n (factorial (- n 1))))) (factorial 5))
    let program = begin(vec![
        def(
            "factorial",
            vec!["n"],
            form(
                "if",
                vec![
                    form("<=", vec![sym("n"), num(1.0)]),
                    num(1.0),
                    form(
                        "*",
                        vec![
                            sym("n"),
                            list(vec![
                                sym("factorial"),
                                form("-", vec![sym("n"), num(1.0)]),
                            ]),
                        ],
                    ),
                ],
            ),
        ),
        list(vec![sym("factorial"), num(5.0)]),
    ]);
    assert_eq!(run(&program), num(120.0));
}

#[test]
fn increment_and_decrement() {
    let program = begin(vec![
        var("n", num(5.0)),
        form("++", vec![sym("n")]),
        form("++", vec![sym("n")]),
        form("--", vec![sym("n")]),
        sym("n"),
    ]);
    assert_eq!(run(&program), num(6.0));
}

#[test]
fn switch_selects_first_truthy_clause() {
    let switch_on = |x: f64| {
        begin(vec![
            var("x", num(x)),
            form(
                "switch",
                vec![
                    list(vec![form("<", vec![sym("x"), num(10.0)]), lit("small")]),
                    list(vec![form(">", vec![sym("x"), num(10.0)]), lit("big")]),
                    list(vec![sym("else"), lit("ten")]),
                ],
            ),
        ])
    };
    assert_eq!(run(&switch_on(5.0)), Value::string("small"));
    assert_eq!(run(&switch_on(15.0)), Value::string("big"));
    assert_eq!(run(&switch_on(10.0)), Value::string("ten"));
}

#[test]
fn for_loop_runs_to_completion() {
    // (for (var i 0) (< i 5) (++ i) i) => 5 (value of the final ++)
    let program = form(
        "for",
        vec![
            var("i", num(0.0)),
            form("<", vec![sym("i"), num(5.0)]),
            form("++", vec![sym("i")]),
            sym("i"),
        ],
    );
    assert_eq!(run(&program), num(5.0));
}

#[test]
fn for_loop_variable_does_not_leak() {
    let program = begin(vec![
        form(
            "for",
            vec![
                var("i", num(0.0)),
                form("<", vec![sym("i"), num(3.0)]),
                form("++", vec![sym("i")]),
                sym("i"),
            ],
        ),
        sym("i"),
    ]);
    let err = run_err(&program);
    assert!(
        matches!(err.inner(), tarn_core::TarnError::UndefinedVariable(name) if name == "i")
    );
}

#[test]
fn print_returns_null() {
    let program = form("print", vec![lit("Hello"), lit("world!")]);
    assert_eq!(run(&program), Value::Null);
}

#[test]
fn plus_concatenates_through_eval() {
    let program = form("+", vec![lit("Hello"), lit(" world")]);
    assert_eq!(run(&program), Value::string("Hello world"));
}

#[test]
fn module_envs_are_isolated() {
    let interp = Interpreter::new();
    let scratch = Env::with_parent(interp.global_env.clone());
    let module_env = create_module_env(&scratch);

    // Defines inside the module env stay there...
    interp
        .eval_in(&var("exported", num(1.0)), &module_env)
        .unwrap();
    assert!(interp.global_env.lookup_str("exported").is_err());
    assert_eq!(
        interp.eval_in(&sym("exported"), &module_env).unwrap(),
        num(1.0)
    );

    // ...while the globals remain reachable.
    assert_eq!(
        interp
            .eval_in(&form("+", vec![num(1.0), num(2.0)]), &module_env)
            .unwrap(),
        num(3.0)
    );
}
