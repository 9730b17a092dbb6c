//! Tree-walking evaluator. Turns a parsed `Code` into an `Object` against an
//! environment chain.
//!
//! Runtime failures are `Object::Error` values, never panics. An error or a
//! pending `return` stops the enclosing block and travels outward untouched;
//! calls unwrap returns, the program unwraps returns, nothing unwraps errors.

use std::rc::Rc;

use crate::runtime::builtins::Builtins;
use crate::runtime::environment::{Env, Environment};
use crate::runtime::object::{Function, NULL, Object};
use crate::syntax::ast::{Block, Code, Expression, InfixOp, PrefixOp, Statement};

/// Return early from the current function when `$obj` is an error or a
/// pending return; otherwise yield it.
macro_rules! propagate {
    ($obj:expr) => {{
        let obj = $obj;
        if obj.is_abrupt() {
            return obj;
        }
        obj
    }};
}

pub struct Evaluator {
    builtins: Rc<Builtins>,
}

impl Evaluator {
    pub fn new(builtins: Rc<Builtins>) -> Self {
        Self { builtins }
    }

    // ─── Statements ──────────────────────────────────────────────────────────

    #[tracing::instrument(level = "debug", skip_all, fields(statements = code.statements.len()))]
    pub fn eval_code(&self, code: &Code, env: &Env) -> Object {
        let mut result = NULL;
        for stmt in &code.statements {
            match self.eval_statement(stmt, env) {
                Object::ReturnValue(v) => return *v,
                err @ Object::Error(_) => {
                    tracing::debug!(%err, "program stopped");
                    return err;
                }
                other => result = other,
            }
        }
        result
    }

    /// Like `eval_code`, but a `return` stays wrapped so it can keep
    /// unwinding to the enclosing call.
    pub fn eval_block(&self, block: &Block, env: &Env) -> Object {
        let mut result = NULL;
        for stmt in &block.statements {
            result = propagate!(self.eval_statement(stmt, env));
        }
        result
    }

    pub fn eval_statement(&self, stmt: &Statement, env: &Env) -> Object {
        match stmt {
            Statement::Let { name, value } => {
                let value = propagate!(self.eval_expression(value, env));
                env.borrow_mut().set(name.as_str(), value);
                NULL
            }
            Statement::Return { value } => {
                let value = propagate!(self.eval_expression(value, env));
                Object::ReturnValue(Box::new(value))
            }
            Statement::Expression { expr } => self.eval_expression(expr, env),
            Statement::Block(block) => self.eval_block(block, env),
        }
    }

    // ─── Expressions ─────────────────────────────────────────────────────────

    pub fn eval_expression(&self, expr: &Expression, env: &Env) -> Object {
        match expr {
            Expression::Identifier(name)  => self.eval_identifier(name, env),
            Expression::IntegerLiteral(v) => Object::Integer(*v),
            Expression::FloatLiteral(v)   => Object::Float(*v),
            Expression::BooleanLiteral(v) => Object::from(*v),
            Expression::StringLiteral(s)  => Object::String(s.clone()),

            Expression::ArrayLiteral(elements) => match self.eval_expressions(elements, env) {
                Ok(items) => Object::array(items),
                Err(abrupt) => abrupt,
            },

            Expression::Prefix { op, operand } => {
                let operand = propagate!(self.eval_expression(operand, env));
                eval_prefix(*op, operand)
            }

            Expression::Infix { op, left, right } => {
                let left = propagate!(self.eval_expression(left, env));
                let right = propagate!(self.eval_expression(right, env));
                eval_infix(*op, left, right)
            }

            Expression::Index { collection, index } => {
                let collection = propagate!(self.eval_expression(collection, env));
                let index = propagate!(self.eval_expression(index, env));
                eval_index(&collection, &index)
            }

            Expression::If { condition, consequence, alternative } => {
                let condition = propagate!(self.eval_expression(condition, env));
                if condition.is_truthy() {
                    self.eval_block(consequence, env)
                } else if let Some(alt) = alternative {
                    self.eval_block(alt, env)
                } else {
                    NULL
                }
            }

            Expression::While { condition, body } => self.eval_while(condition, body, env),

            Expression::FunctionLiteral { params, body } => Object::Function(Rc::new(Function {
                params: params.clone(),
                body: body.clone(),
                env: Rc::clone(env),
            })),

            Expression::Call { callee, args } => {
                let function = propagate!(self.eval_expression(callee, env));
                match self.eval_expressions(args, env) {
                    Ok(args) => self.apply_function(&function, args),
                    Err(abrupt) => abrupt,
                }
            }
        }
    }

    /// Left to right, stopping at the first error or pending return.
    fn eval_expressions(&self, exprs: &[Expression], env: &Env) -> Result<Vec<Object>, Object> {
        let mut values = Vec::with_capacity(exprs.len());
        for expr in exprs {
            let value = self.eval_expression(expr, env);
            if value.is_abrupt() {
                return Err(value);
            }
            values.push(value);
        }
        Ok(values)
    }

    /// User bindings shadow builtins of the same name.
    fn eval_identifier(&self, name: &str, env: &Env) -> Object {
        if let Some(value) = env.borrow().get(name) {
            return value;
        }
        match self.builtins.get(name) {
            Some(builtin) => Object::Builtin(builtin.clone()),
            None => Object::error(format!("identifier not found: {name}")),
        }
    }

    /// Collects each iteration's value into an array. A body error ends the
    /// loop and comes back as the only element.
    fn eval_while(&self, condition: &Expression, body: &Block, env: &Env) -> Object {
        let mut results = Vec::new();
        loop {
            let cond = propagate!(self.eval_expression(condition, env));
            if !cond.is_truthy() {
                break;
            }
            match self.eval_block(body, env) {
                err @ Object::Error(_) => return Object::array(vec![err]),
                ret @ Object::ReturnValue(_) => return ret,
                value => results.push(value),
            }
        }
        Object::array(results)
    }

    // ─── Calls ───────────────────────────────────────────────────────────────

    #[tracing::instrument(level = "debug", skip_all, fields(callee = function.type_name(), argc = args.len()))]
    pub fn apply_function(&self, function: &Object, args: Vec<Object>) -> Object {
        match function {
            Object::Function(func) => {
                if func.params.len() != args.len() {
                    return Object::error(format!(
                        "wrong number of arguments: expected {}, got {}",
                        func.params.len(),
                        args.len()
                    ));
                }
                let frame = Environment::new_child(&func.env);
                {
                    let mut frame = frame.borrow_mut();
                    for (param, arg) in func.params.iter().zip(args) {
                        frame.set(param.as_str(), arg);
                    }
                }
                match self.eval_block(&func.body, &frame) {
                    Object::ReturnValue(v) => *v,
                    other => other,
                }
            }
            Object::Builtin(builtin) => builtin.call(&args),
            other => Object::error(format!("not a function: {}", other.type_name())),
        }
    }
}

// ─── Operators ────────────────────────────────────────────────────────────────

fn eval_prefix(op: PrefixOp, operand: Object) -> Object {
    match (op, &operand) {
        (PrefixOp::Bang, Object::Boolean(b))   => Object::from(!*b),
        (PrefixOp::Minus, Object::Integer(v))  => match v.checked_neg() {
            Some(n) => Object::Integer(n),
            None => Object::error("integer overflow"),
        },
        (PrefixOp::Minus, Object::Float(v))    => Object::Float(-v),
        _ => Object::error(format!("unknown operator: {op}{}", operand.type_name())),
    }
}

fn eval_infix(op: InfixOp, left: Object, right: Object) -> Object {
    let result = match (&left, &right) {
        (Object::Integer(l), Object::Integer(r)) => integer_infix(op, *l, *r),
        (Object::Float(l), Object::Float(r))     => float_infix(op, *l, *r),
        (Object::Boolean(l), Object::Boolean(r)) => boolean_infix(op, *l, *r),
        (Object::String(l), Object::String(r))   => string_infix(op, l, r),
        _ => None,
    };

    result.unwrap_or_else(|| {
        if left.type_name() != right.type_name() {
            Object::error(format!("type mismatch: {} {op} {}", left.type_name(), right.type_name()))
        } else {
            Object::error(format!("unknown operator: {} {op} {}", left.type_name(), right.type_name()))
        }
    })
}

fn integer_infix(op: InfixOp, l: i64, r: i64) -> Option<Object> {
    let checked = |v: Option<i64>| v.map_or_else(|| Object::error("integer overflow"), Object::Integer);
    Some(match op {
        InfixOp::Plus     => checked(l.checked_add(r)),
        InfixOp::Minus    => checked(l.checked_sub(r)),
        InfixOp::Asterisk => checked(l.checked_mul(r)),
        InfixOp::Slash if r == 0 => Object::error("division by zero"),
        InfixOp::Slash    => checked(l.checked_div(r)),
        InfixOp::Lt       => Object::from(l < r),
        InfixOp::Gt       => Object::from(l > r),
        InfixOp::Eq       => Object::from(l == r),
        InfixOp::NotEq    => Object::from(l != r),
        InfixOp::And | InfixOp::Or => return None,
    })
}

fn float_infix(op: InfixOp, l: f64, r: f64) -> Option<Object> {
    let equal = (l - r).abs() < f64::EPSILON;
    Some(match op {
        InfixOp::Plus     => Object::Float(l + r),
        InfixOp::Minus    => Object::Float(l - r),
        InfixOp::Asterisk => Object::Float(l * r),
        InfixOp::Slash    => Object::Float(l / r),
        InfixOp::Lt       => Object::from(l < r),
        InfixOp::Gt       => Object::from(l > r),
        InfixOp::Eq       => Object::from(equal),
        InfixOp::NotEq    => Object::from(!equal),
        InfixOp::And | InfixOp::Or => return None,
    })
}

/// Both sides are already evaluated, so `&&` and `||` do not short-circuit.
fn boolean_infix(op: InfixOp, l: bool, r: bool) -> Option<Object> {
    match op {
        InfixOp::Eq    => Some(Object::from(l == r)),
        InfixOp::NotEq => Some(Object::from(l != r)),
        InfixOp::And   => Some(Object::from(l && r)),
        InfixOp::Or    => Some(Object::from(l || r)),
        _ => None,
    }
}

fn string_infix(op: InfixOp, l: &str, r: &str) -> Option<Object> {
    match op {
        InfixOp::Plus => Some(Object::String(format!("{l}{r}"))),
        _ => None,
    }
}

fn eval_index(collection: &Object, index: &Object) -> Object {
    match (collection, index) {
        (Object::Array(items), Object::Integer(i)) => {
            let items = items.borrow();
            usize::try_from(*i).ok()
                .and_then(|i| items.get(i).cloned())
                .unwrap_or_else(|| Object::error(format!("index out of bounds: {i} (length {})", items.len())))
        }
        _ => Object::error(format!(
            "index operator not supported: {}[{}]",
            collection.type_name(),
            index.type_name()
        )),
    }
}
