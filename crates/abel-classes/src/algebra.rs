//! Expression algebra over the equivariant classes.
//!
//! An integrand is a [`ClassExpr`] tree built from the primitive classes
//! with sums, products, integer powers and quotients. A [`ClassExpr::Vector`]
//! makes the expression vector-valued; scalars broadcast against vectors
//! pointwise, so several invariants can be computed in one traversal of
//! the fixed loci. The algebra also carries the static checks the
//! integrator runs before any enumeration: argument ranges, per-slot
//! codimension bookkeeping, and the rules restricting psi and jet
//! classes.

use std::ops::{Add, Div, Mul, Neg, Sub};

use abel_core::errors::{AbelError, Result};
use abel_core::rational::{invert, pow_int, rat, Rat};

use crate::context::FixedPoint;
use crate::library;

/// A primitive equivariant class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Primitive {
    /// Hyperplane class at mark `i` (1-based).
    O1At(usize),
    /// Product of the hyperplane classes of all marks.
    O1,
    /// Sections of a degree-`b` hypersurface.
    Hypersurface(i64),
    /// Incidence to a linear subspace of codimension `r`.
    Incidency(i64),
    /// Psi classes; exponent `i` belongs to mark `i + 1`, missing
    /// trailing entries are zero.
    Psi(Vec<i64>),
    /// Jet bundle of order `p` twisted by `q` hyperplanes, at the first
    /// mark.
    Jet(i64, i64),
    /// Contact conditions against a plane curve.
    Contact,
    /// First derived pushforward of the `k`-th dual hyperplane power.
    R1(i64),
}

/// An equivariant class expression.
#[derive(Debug, Clone)]
pub enum ClassExpr {
    Primitive(Primitive),
    Scalar(Rat),
    Sum(Vec<ClassExpr>),
    Product(Vec<ClassExpr>),
    Pow(Box<ClassExpr>, i64),
    Quotient(Box<ClassExpr>, Box<ClassExpr>),
    Vector(Vec<ClassExpr>),
}

/// Value of a class expression at one fixed point.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Rat),
    Vector(Vec<Rat>),
}

impl Value {
    /// The value of every slot, broadcasting a scalar.
    pub fn into_slots(self, arity: usize) -> Vec<Rat> {
        match self {
            Value::Scalar(v) => vec![v; arity],
            Value::Vector(vs) => vs,
        }
    }
}

/// Hyperplane class at the `i`-th mark (1-based).
pub fn o1_i(mark: usize) -> ClassExpr {
    ClassExpr::Primitive(Primitive::O1At(mark))
}

/// Product of the hyperplane classes of all marks.
pub fn o1() -> ClassExpr {
    ClassExpr::Primitive(Primitive::O1)
}

/// Hypersurface class; several degrees multiply, as for a complete
/// intersection.
pub fn hypersurface(degrees: &[i64]) -> ClassExpr {
    let factors: Vec<ClassExpr> = degrees
        .iter()
        .map(|&b| ClassExpr::Primitive(Primitive::Hypersurface(b)))
        .collect();
    flatten_product(factors)
}

/// Incidency class; several codimensions multiply.
pub fn incidency(codimensions: &[i64]) -> ClassExpr {
    let factors: Vec<ClassExpr> = codimensions
        .iter()
        .map(|&r| ClassExpr::Primitive(Primitive::Incidency(r)))
        .collect();
    flatten_product(factors)
}

/// Psi class; exponent `i` belongs to mark `i + 1`, marks beyond the end
/// of the slice get exponent zero.
pub fn psi(exponents: &[i64]) -> ClassExpr {
    ClassExpr::Primitive(Primitive::Psi(exponents.to_vec()))
}

/// Jet class of order `p`, twisted by `q` hyperplanes.
pub fn jet(p: i64, q: i64) -> ClassExpr {
    ClassExpr::Primitive(Primitive::Jet(p, q))
}

/// Contact class.
pub fn contact() -> ClassExpr {
    ClassExpr::Primitive(Primitive::Contact)
}

/// R1 class of level `k`.
pub fn r1(k: i64) -> ClassExpr {
    ClassExpr::Primitive(Primitive::R1(k))
}

/// Constant class.
pub fn scalar(value: Rat) -> ClassExpr {
    ClassExpr::Scalar(value)
}

/// Vector of classes computed in one pass.
pub fn vector(components: Vec<ClassExpr>) -> ClassExpr {
    ClassExpr::Vector(components)
}

fn flatten_product(mut factors: Vec<ClassExpr>) -> ClassExpr {
    if factors.len() == 1 {
        factors.pop().unwrap()
    } else {
        ClassExpr::Product(factors)
    }
}

impl ClassExpr {
    /// Integer power of a class.
    pub fn pow(self, exponent: i64) -> ClassExpr {
        ClassExpr::Pow(Box::new(self), exponent)
    }
}

impl From<i64> for ClassExpr {
    fn from(value: i64) -> Self {
        ClassExpr::Scalar(rat(value))
    }
}

impl Add for ClassExpr {
    type Output = ClassExpr;
    fn add(self, rhs: ClassExpr) -> ClassExpr {
        match self {
            ClassExpr::Sum(mut terms) => {
                terms.push(rhs);
                ClassExpr::Sum(terms)
            }
            other => ClassExpr::Sum(vec![other, rhs]),
        }
    }
}

impl Mul for ClassExpr {
    type Output = ClassExpr;
    fn mul(self, rhs: ClassExpr) -> ClassExpr {
        match self {
            ClassExpr::Product(mut factors) => {
                factors.push(rhs);
                ClassExpr::Product(factors)
            }
            other => ClassExpr::Product(vec![other, rhs]),
        }
    }
}

impl Neg for ClassExpr {
    type Output = ClassExpr;
    fn neg(self) -> ClassExpr {
        ClassExpr::Scalar(rat(-1)) * self
    }
}

impl Sub for ClassExpr {
    type Output = ClassExpr;
    fn sub(self, rhs: ClassExpr) -> ClassExpr {
        self + (-rhs)
    }
}

impl Div for ClassExpr {
    type Output = ClassExpr;
    fn div(self, rhs: ClassExpr) -> ClassExpr {
        ClassExpr::Quotient(Box::new(self), Box::new(rhs))
    }
}

impl Mul<ClassExpr> for i64 {
    type Output = ClassExpr;
    fn mul(self, rhs: ClassExpr) -> ClassExpr {
        ClassExpr::from(self) * rhs
    }
}

/// Validates every primitive argument against the number of marks.
pub fn check_arguments(expr: &ClassExpr, num_marks: usize) -> Result<()> {
    match expr {
        ClassExpr::Primitive(p) => match p {
            Primitive::O1At(i) => {
                if *i < 1 || *i > num_marks {
                    return Err(AbelError::class_argument(format!(
                        "mark index {} must be between 1 and {}",
                        i, num_marks
                    )));
                }
                Ok(())
            }
            Primitive::O1 => {
                if num_marks == 0 {
                    return Err(AbelError::class_argument(
                        "O1 requires at least one mark",
                    ));
                }
                Ok(())
            }
            Primitive::Hypersurface(b) => {
                if *b < 1 {
                    return Err(AbelError::class_argument(
                        "hypersurface degree must be positive",
                    ));
                }
                Ok(())
            }
            Primitive::Incidency(r) => {
                if *r < 1 {
                    return Err(AbelError::class_argument(
                        "incidency codimension must be positive",
                    ));
                }
                Ok(())
            }
            Primitive::Psi(exponents) => {
                if exponents.is_empty() || exponents.len() > num_marks {
                    return Err(AbelError::class_argument(format!(
                        "psi takes between 1 and {} exponents, got {}",
                        num_marks,
                        exponents.len()
                    )));
                }
                if exponents.iter().any(|&a| a < 0) {
                    return Err(AbelError::class_argument(
                        "psi exponents must be non-negative",
                    ));
                }
                Ok(())
            }
            Primitive::Jet(p, _) => {
                if num_marks == 0 {
                    return Err(AbelError::class_argument(
                        "jet requires at least one mark",
                    ));
                }
                if *p < 0 {
                    return Err(AbelError::class_argument(
                        "jet order must be non-negative",
                    ));
                }
                Ok(())
            }
            Primitive::Contact => Ok(()),
            Primitive::R1(k) => {
                if *k < 1 {
                    return Err(AbelError::class_argument(
                        "R1 level must be positive",
                    ));
                }
                Ok(())
            }
        },
        ClassExpr::Scalar(_) => Ok(()),
        ClassExpr::Sum(children)
        | ClassExpr::Product(children)
        | ClassExpr::Vector(children) => {
            if children.is_empty() {
                return Err(AbelError::class_argument(
                    "a sum, product or vector needs at least one class",
                ));
            }
            children.iter().try_for_each(|c| check_arguments(c, num_marks))
        }
        ClassExpr::Pow(base, _) => check_arguments(base, num_marks),
        ClassExpr::Quotient(a, b) => {
            check_arguments(a, num_marks)?;
            check_arguments(b, num_marks)
        }
    }
}

/// Whether the expression evaluates to a vector rather than a single
/// rational.
pub fn is_vector_valued(expr: &ClassExpr) -> bool {
    match expr {
        ClassExpr::Primitive(_) | ClassExpr::Scalar(_) => false,
        ClassExpr::Vector(_) => true,
        ClassExpr::Sum(children) | ClassExpr::Product(children) => {
            children.iter().any(is_vector_valued)
        }
        ClassExpr::Pow(base, _) => is_vector_valued(base),
        ClassExpr::Quotient(a, b) => is_vector_valued(a) || is_vector_valued(b),
    }
}

/// Static shape of an expression: one codimension per output slot, and
/// whether the slots came from a vector. A one-component vector carries
/// `vector: true` and only aligns with scalars and other one-component
/// vectors.
struct Shape {
    slots: Vec<i64>,
    vector: bool,
}

fn broadcast_shapes(a: Shape, b: Shape) -> Result<(Vec<i64>, Vec<i64>, bool)> {
    if a.vector && b.vector && a.slots.len() != b.slots.len() {
        return Err(AbelError::composition(format!(
            "cannot align a {}-vector with a {}-vector",
            a.slots.len(),
            b.slots.len()
        )));
    }
    let vector = a.vector || b.vector;
    let (x, y) = match (a.slots.len(), b.slots.len()) {
        (x, y) if x == y => (a.slots, b.slots),
        (1, y) => (vec![a.slots[0]; y], b.slots),
        (_, 1) => {
            let len = a.slots.len();
            (a.slots, vec![b.slots[0]; len])
        }
        // Slot counts other than one always come from vectors, which were
        // rejected above.
        _ => unreachable!("scalar shapes have exactly one slot"),
    };
    Ok((x, y, vector))
}

fn codimension_shape(expr: &ClassExpr, d: i64, num_marks: usize) -> Result<Shape> {
    let scalar = |codim: i64| Shape {
        slots: vec![codim],
        vector: false,
    };
    match expr {
        ClassExpr::Primitive(p) => Ok(scalar(match p {
            Primitive::O1At(_) => 1,
            Primitive::O1 => num_marks as i64,
            Primitive::Hypersurface(b) => b * d + 1,
            Primitive::Incidency(r) => r - 1,
            Primitive::Psi(exponents) => exponents.iter().sum(),
            Primitive::Jet(p, _) => p + 1,
            Primitive::Contact => 2 * d - 1,
            Primitive::R1(k) => k * d - 1,
        })),
        ClassExpr::Scalar(_) => Ok(scalar(0)),
        ClassExpr::Sum(terms) => {
            let mut common: Option<Shape> = None;
            for term in terms {
                let shape = codimension_shape(term, d, num_marks)?;
                common = Some(match common {
                    None => shape,
                    Some(existing) => {
                        let (x, y, vector) = broadcast_shapes(existing, shape)?;
                        if x != y {
                            return Err(AbelError::composition(format!(
                                "sum mixes codimensions {:?} and {:?}",
                                x, y
                            )));
                        }
                        Shape { slots: x, vector }
                    }
                });
            }
            common.ok_or_else(|| AbelError::composition("empty sum"))
        }
        ClassExpr::Product(factors) => {
            let mut total = Shape {
                slots: vec![0],
                vector: false,
            };
            for factor in factors {
                let shape = codimension_shape(factor, d, num_marks)?;
                let (x, y, vector) = broadcast_shapes(total, shape)?;
                total = Shape {
                    slots: x.iter().zip(&y).map(|(a, b)| a + b).collect(),
                    vector,
                };
            }
            Ok(total)
        }
        ClassExpr::Pow(base, exponent) => {
            let shape = codimension_shape(base, d, num_marks)?;
            Ok(Shape {
                slots: shape.slots.into_iter().map(|c| c * exponent).collect(),
                vector: shape.vector,
            })
        }
        ClassExpr::Quotient(a, b) => {
            let (x, y, vector) = broadcast_shapes(
                codimension_shape(a, d, num_marks)?,
                codimension_shape(b, d, num_marks)?,
            )?;
            Ok(Shape {
                slots: x.iter().zip(&y).map(|(a, b)| a - b).collect(),
                vector,
            })
        }
        ClassExpr::Vector(components) => {
            if components.is_empty() {
                return Err(AbelError::composition("empty vector class"));
            }
            let mut slots = Vec::with_capacity(components.len());
            for component in components {
                let inner = codimension_shape(component, d, num_marks)?;
                if inner.vector {
                    return Err(AbelError::composition(
                        "vector components must be scalar-valued",
                    ));
                }
                slots.push(inner.slots[0]);
            }
            Ok(Shape {
                slots,
                vector: true,
            })
        }
    }
}

/// Codimension of each output slot of the expression for degree `d` with
/// `num_marks` marks. A scalar-valued expression yields one slot; vector
/// slots broadcast against scalars. Addends of a sum must agree slot by
/// slot, and vectors of different lengths never align, a one-component
/// vector included.
pub fn codimension(expr: &ClassExpr, d: i64, num_marks: usize) -> Result<Vec<i64>> {
    Ok(codimension_shape(expr, d, num_marks)?.slots)
}

/// Number of psi and jet factors a monomial of the expression can carry.
fn psi_profile(expr: &ClassExpr) -> Result<(i64, i64)> {
    match expr {
        ClassExpr::Primitive(Primitive::Psi(exponents)) => {
            if exponents.iter().any(|&a| a > 0) {
                Ok((1, 0))
            } else {
                Ok((0, 0))
            }
        }
        ClassExpr::Primitive(Primitive::Jet(_, _)) => Ok((0, 1)),
        ClassExpr::Primitive(_) | ClassExpr::Scalar(_) => Ok((0, 0)),
        ClassExpr::Sum(children) | ClassExpr::Vector(children) => {
            let mut worst = (0, 0);
            for child in children {
                let (p, j) = psi_profile(child)?;
                worst = (worst.0.max(p), worst.1.max(j));
            }
            Ok(worst)
        }
        ClassExpr::Product(factors) => {
            let mut total = (0, 0);
            for factor in factors {
                let (p, j) = psi_profile(factor)?;
                total = (total.0 + p, total.1 + j);
            }
            Ok(total)
        }
        ClassExpr::Pow(base, exponent) => {
            let (p, j) = psi_profile(base)?;
            if *exponent < 0 && (p > 0 || j > 0) {
                return Err(AbelError::composition(
                    "psi and jet classes cannot be inverted",
                ));
            }
            let e = (*exponent).max(0);
            Ok((p * e, j * e))
        }
        ClassExpr::Quotient(a, b) => {
            let (pb, jb) = psi_profile(b)?;
            if pb > 0 || jb > 0 {
                return Err(AbelError::composition(
                    "psi and jet classes cannot appear in a denominator",
                ));
            }
            psi_profile(a)
        }
    }
}

/// Enforces the structural rules on psi and jet classes: at most one such
/// factor in any monomial.
pub fn check_psi_usage(expr: &ClassExpr) -> Result<()> {
    let (p, j) = psi_profile(expr)?;
    if p + j > 1 {
        return Err(AbelError::composition(
            "psi and jet classes may appear at most once in a monomial",
        ));
    }
    Ok(())
}

fn zip_values<F>(a: Value, b: Value, f: F) -> Result<Value>
where
    F: Fn(Rat, Rat) -> Result<Rat>,
{
    match (a, b) {
        (Value::Scalar(x), Value::Scalar(y)) => Ok(Value::Scalar(f(x, y)?)),
        (Value::Scalar(x), Value::Vector(ys)) => Ok(Value::Vector(
            ys.into_iter()
                .map(|y| f(x.clone(), y))
                .collect::<Result<Vec<_>>>()?,
        )),
        (Value::Vector(xs), Value::Scalar(y)) => Ok(Value::Vector(
            xs.into_iter()
                .map(|x| f(x, y.clone()))
                .collect::<Result<Vec<_>>>()?,
        )),
        (Value::Vector(xs), Value::Vector(ys)) => {
            if xs.len() != ys.len() {
                return Err(AbelError::composition(format!(
                    "cannot align a {}-vector with a {}-vector",
                    xs.len(),
                    ys.len()
                )));
            }
            Ok(Value::Vector(
                xs.into_iter()
                    .zip(ys)
                    .map(|(x, y)| f(x, y))
                    .collect::<Result<Vec<_>>>()?,
            ))
        }
    }
}

/// Evaluates a class expression at one fixed point.
pub fn evaluate(expr: &ClassExpr, fp: &FixedPoint) -> Result<Value> {
    match expr {
        ClassExpr::Primitive(p) => Ok(Value::Scalar(match p {
            Primitive::O1At(i) => library::o1_at_mark(fp, i - 1),
            Primitive::O1 => library::o1_all(fp),
            Primitive::Hypersurface(b) => library::hypersurface_value(fp, *b)?,
            Primitive::Incidency(r) => library::incidency_value(fp, *r)?,
            Primitive::Psi(exponents) => {
                let mut padded: Vec<u64> =
                    exponents.iter().map(|&a| a as u64).collect();
                padded.resize(fp.graph().num_marks(), 0);
                library::psi_value(fp, &padded)?
            }
            Primitive::Jet(p, q) => library::jet_value(fp, *p, *q)?,
            Primitive::Contact => library::contact_value(fp)?,
            Primitive::R1(k) => library::r1_value(fp, *k)?,
        })),
        ClassExpr::Scalar(value) => Ok(Value::Scalar(value.clone())),
        ClassExpr::Sum(terms) => {
            let mut total = Value::Scalar(rat(0));
            for term in terms {
                total = zip_values(total, evaluate(term, fp)?, |x, y| Ok(x + y))?;
            }
            Ok(total)
        }
        ClassExpr::Product(factors) => {
            let mut total = Value::Scalar(rat(1));
            for factor in factors {
                total = zip_values(total, evaluate(factor, fp)?, |x, y| Ok(x * y))?;
            }
            Ok(total)
        }
        ClassExpr::Pow(base, exponent) => match evaluate(base, fp)? {
            Value::Scalar(v) => Ok(Value::Scalar(pow_int(&v, *exponent)?)),
            Value::Vector(vs) => Ok(Value::Vector(
                vs.iter()
                    .map(|v| pow_int(v, *exponent))
                    .collect::<Result<Vec<_>>>()?,
            )),
        },
        ClassExpr::Quotient(a, b) => zip_values(
            evaluate(a, fp)?,
            evaluate(b, fp)?,
            |x, y| Ok(x * invert(&y)?),
        ),
        ClassExpr::Vector(components) => {
            let mut values = Vec::with_capacity(components.len());
            for component in components {
                match evaluate(component, fp)? {
                    Value::Scalar(v) => values.push(v),
                    Value::Vector(_) => {
                        return Err(AbelError::composition(
                            "vector components must be scalar-valued",
                        ));
                    }
                }
            }
            Ok(Value::Vector(values))
        }
    }
}
