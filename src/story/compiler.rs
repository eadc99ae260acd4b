//! The compiler: walks the transformed tree and emits the line-indexed [`value::Instruction`]
//! mapping, per `spec.md` §4.5/§4.6.
//!
//! Dispatch is a tagged-variant exhaustive match rather than the original's dynamic
//! dispatch-by-rule-name, per the design notes' own guidance (see `DESIGN.md`). The nested-block
//! traversal (`subtree`/`subtrees` in the original) collapses here into one recursive
//! `compile_block_list`, since this grammar gives every nested body the same `NestedBlock` shape
//! as the program root instead of a separate named production per caller.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use crate::story::error::StoryError;
use crate::story::grammar::AstNode;
use crate::story::tree::Tree;
use crate::story::value::{Instruction, Operand, Script, Value};
use crate::Code;

static INTERPOLATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{([^}]*)\}\}").unwrap());

fn strip_quotes(raw: &str) -> &str {
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        &raw[1..raw.len() - 1]
    } else {
        raw
    }
}

/// `path(tree)` → `{$OBJECT:'path', paths: [child.value, …]}`. Every child of a `Path` node is
/// tagged `Identifier`, whether it came from a dotted segment (raw identifier text) or a
/// bracketed segment (a string-literal token, quotes stripped here).
pub fn path(tree: Tree) -> Operand {
    let paths = tree
        .children()
        .map(|child| strip_quotes(child.text()).to_string())
        .collect();
    Operand::Path { paths }
}

/// `number`/`signed_number`: the sole two children are the optional tagged minus sign and the
/// integer token. See `DESIGN.md`'s `SignedNumber` note for why the sign is tagged rather than
/// hidden.
fn signed_number(tree: Tree) -> Result<i64, StoryError> {
    let sign = tree.child(0).ok_or(StoryError::internal("signed-number"))?;
    let magnitude_tree = tree.child(1).ok_or(StoryError::internal("signed-number"))?;
    let magnitude: i64 = magnitude_tree
        .text()
        .parse()
        .map_err(|_| StoryError::internal("signed-number"))?;
    Ok(if sign.data() == AstNode::Minus {
        -magnitude
    } else {
        magnitude
    })
}

/// `string(tree)`: strip surrounding quotes, scan for `\{\{([^}]*)\}\}` interpolation
/// placeholders. Each placeholder's captured text becomes a single-segment path — grounded on
/// `examples/original_source/storyscript/ast.py`'s `String.json`, which always treats an
/// interpolated chunk as a whole `Path`, never splitting it on `.`.
pub fn string(tree: Tree) -> Operand {
    let inner = strip_quotes(tree.text());
    let mut string_out = String::new();
    let mut values = Vec::new();
    let mut last = 0;
    for caps in INTERPOLATION.captures_iter(inner) {
        let whole = caps.get(0).unwrap();
        string_out.push_str(&inner[last..whole.start()]);
        string_out.push_str("{}");
        values.push(Operand::Path {
            paths: vec![caps[1].to_string()],
        });
        last = whole.end();
    }
    string_out.push_str(&inner[last..]);
    let values = if values.is_empty() { None } else { Some(values) };
    Operand::String {
        string: string_out,
        values,
    }
}

/// `boolean(tree)` → native true/false, discriminated on the leaf's own source text.
pub fn boolean(tree: Tree) -> bool {
    tree.text() == "true"
}

/// `file(token)` → `{$OBJECT:'file', string: lexeme stripped of enclosing backticks}`.
pub fn file(tree: Tree) -> Operand {
    let raw = tree.text();
    let inner = if raw.len() >= 2 { &raw[1..raw.len() - 1] } else { raw };
    Operand::File {
        string: inner.to_string(),
    }
}

/// The value an `expr_atom` alternative resolves to, as a [`Value`] (a signed number is always
/// `int`, never `Value::Raw`).
fn atom_value(tree: Tree) -> Result<Value, StoryError> {
    match tree.data() {
        AstNode::SignedNumber => Ok(Value::Operand(Operand::Int {
            int: signed_number(tree)?,
        })),
        AstNode::Path => Ok(Value::Operand(path(tree))),
        AstNode::StringLit => Ok(Value::Operand(string(tree))),
        AstNode::Boolean => Ok(Value::Bool(boolean(tree))),
        _ => Err(StoryError::internal("expr-atom")),
    }
}

/// Maps an `expr_operator` leaf's source text to the word-form mixin name used in the
/// `expression` string. Grounded on
/// `examples/original_source/tests/integration/compiler/Compiler.py`'s
/// `test_compiler_expression_whitespace` parametrize table.
fn operator_name(lexeme: &str) -> Result<&'static str, StoryError> {
    Ok(match lexeme {
        "+" => "sum",
        "-" => "subtraction",
        "*" => "multiplication",
        "/" => "division",
        "%" => "modulus",
        "==" => "equals",
        "!=" => "not_equal",
        "<" => "less",
        ">" => "greater",
        "<=" => "less_equal",
        ">=" => "greater_equal",
        "and" => "and",
        "or" => "or",
        _ => return Err(StoryError::internal("operator")),
    })
}

/// `expression(tree)`. A single-atom expression (no trailing operator/operand pairs) unwraps
/// directly to that atom's own plain value instead of an `expression` operand — grounded on
/// `examples/original_source/storyscript/ast.py`'s `Expression.json`, which special-cases
/// `len(self.expressions) == 1` the same way.
///
/// For two or more atoms, the `expression` string is the space-joined sequence of operator word
/// names (never the raw symbols, never the operands themselves) and every atom — literal or
/// not — is pushed into `values` in positional order. This follows `spec.md` §8's literal worked
/// fixture (`{expression:'sum', values:[int(1), int(2)]}`) rather than `ast.py`'s older model of
/// inlining literal operands directly into the expression string with no placeholder; the two
/// disagree, and `spec.md`'s explicit worked scenario wins per this repository's standing
/// resolution for open/ambiguous points. This grammar never nests one `expression` inside
/// another (`expr_atom` has no `expression` alternative), so the "inline a nested expression's
/// own `expression`/`values`" rule in `spec.md` §4.6 has no reachable case here.
fn expression(tree: Tree) -> Result<Value, StoryError> {
    let atoms: Vec<Tree> = tree.children().collect();
    if atoms.len() == 1 {
        return atom_value(atoms[0]);
    }
    let mut words = Vec::new();
    let mut values = Vec::new();
    values.push(atom_value(atoms[0])?);
    let mut i = 1;
    while i + 1 < atoms.len() {
        words.push(operator_name(atoms[i].text())?);
        values.push(atom_value(atoms[i + 1])?);
        i += 2;
    }
    Ok(Value::Operand(Operand::Expression {
        expression: words.join(" "),
        values,
    }))
}

/// `list(tree)` → `{$OBJECT:'list', items: [values(child) for each child]}`. An empty list
/// parses to a single tagged `Null` placeholder child (see `DESIGN.md`'s `List` nullability
/// note); skip it rather than feeding it to `values`.
fn list(tree: Tree) -> Result<Operand, StoryError> {
    let mut items = Vec::new();
    for child in tree.children() {
        if child.data() == AstNode::Null {
            continue;
        }
        items.push(values(child)?);
    }
    Ok(Operand::List { items })
}

/// `objects(tree)` (dict literal) → `{$OBJECT:'dict', items: [[string(key), values(value)] …]}`.
fn objects(tree: Tree) -> Result<Operand, StoryError> {
    let mut items = Vec::new();
    for entry in tree.children() {
        if entry.data() == AstNode::Null {
            continue;
        }
        let key = entry.child(0).ok_or(StoryError::internal("dict-entry"))?;
        let val = entry.child(1).ok_or(StoryError::internal("dict-entry"))?;
        items.push((Value::Operand(string(key)), values(val)?));
    }
    Ok(Operand::Dict { items })
}

/// `values(tree)` dispatches by the child's tag: `expression`, `list`, `dict`, or a `FILEPATH`
/// leaf (delegated to `file`). Plain scalars (number/string/boolean/path) never reach `values`
/// directly in this grammar — they only ever arrive wrapped in an `expression`, which
/// `expression()` itself unwraps when it has no trailing operator.
pub fn values(tree: Tree) -> Result<Value, StoryError> {
    match tree.data() {
        AstNode::Expression => expression(tree),
        AstNode::List => Ok(Value::Operand(list(tree)?)),
        AstNode::Dict => Ok(Value::Operand(objects(tree)?)),
        AstNode::Filepath => Ok(Value::Operand(file(tree))),
        _ => Err(StoryError::internal("values")),
    }
}

/// `argument(tree)`: after the transformer's short-hand expansion every `Argument` node has
/// exactly two children, `[name, value]`.
fn argument(tree: Tree) -> Result<Operand, StoryError> {
    let name = tree
        .child(0)
        .ok_or(StoryError::internal("argument"))?
        .text()
        .to_string();
    let value_tree = tree.child(1).ok_or(StoryError::internal("argument"))?;
    Ok(Operand::Argument {
        name,
        argument: Box::new(values(value_tree)?),
    })
}

/// `mutation(tree)` → `{$OBJECT:'mutation', mutation: name, arguments: [argument, …]}`.
fn mutation(tree: Tree) -> Result<Operand, StoryError> {
    let name = tree
        .child(0)
        .ok_or(StoryError::internal("mutation"))?
        .text()
        .to_string();
    let mut arguments = Vec::new();
    for arg in tree.children().skip(1) {
        if arg.data() == AstNode::Null {
            continue;
        }
        arguments.push(argument(arg)?);
    }
    Ok(Operand::Mutation {
        mutation: name,
        arguments,
    })
}

/// `base(method, ln, …)` → the one-entry instruction map. `output` is reserved and always
/// absent, per `spec.md` §4.5.
fn base(
    method: &str,
    ln: usize,
    container: Option<String>,
    args: Option<Vec<Value>>,
    enter: Option<usize>,
    exit: Option<usize>,
) -> BTreeMap<String, Instruction> {
    let mut out = BTreeMap::new();
    out.insert(
        ln.to_string(),
        Instruction::new(method, ln, container, args, enter, exit),
    );
    out
}

/// `assignments(tree)` → `base('set', line, args=[path(tree.node('path')), values(tree.child(1))])`.
/// (This grammar hides the `=` token, so the value lands at `child(1)`, not the original's
/// `child(2)` — see `DESIGN.md`.)
fn assignments(tree: Tree) -> Result<BTreeMap<String, Instruction>, StoryError> {
    let path_tree = tree.child(0).ok_or(StoryError::internal("assignment"))?;
    let value_tree = tree.child(1).ok_or(StoryError::internal("assignment"))?;
    let args = vec![Value::Operand(path(path_tree)), values(value_tree)?];
    Ok(base("set", tree.line(), None, Some(args), None, None))
}

/// `next(tree)` → `base('next', line, args=[file(tree.child(0))])`. (`child(0)`, not the
/// original's `child(1)`: the `next` keyword is a hidden token here.)
fn next(tree: Tree) -> Result<BTreeMap<String, Instruction>, StoryError> {
    let file_tree = tree.child(0).ok_or(StoryError::internal("next"))?;
    let args = vec![Value::Operand(file(file_tree))];
    Ok(base("next", tree.line(), None, Some(args), None, None))
}

/// `command(tree)` → `base('run', line, container=tree.child().child().value)`. Per `spec.md`
/// §4.5 literally: only the container (the first segment of the service path) is captured, the
/// service's own arguments are not threaded into this instruction.
fn command(tree: Tree) -> Result<BTreeMap<String, Instruction>, StoryError> {
    let service_fragment = tree.child(0).ok_or(StoryError::internal("command"))?;
    let path_tree = service_fragment
        .child(0)
        .ok_or(StoryError::internal("command"))?;
    let container = path_tree
        .child(0)
        .ok_or(StoryError::internal("command"))?
        .text()
        .to_string();
    Ok(base("run", tree.line(), Some(container), None, None, None))
}

/// A bare value optionally followed by a chain of mutations, standalone on its own line (e.g.
/// `"1 increment then format to:\"string\""`). `spec.md` §4.5 names exactly eight instruction
/// emitters and none of them cover this shape, yet §8's "Chained mutation" scenario requires it
/// to compile to one instruction whose `args` is `[value, mutation, mutation, …]` — confirmed via
/// `examples/original_source/tests/integration/compiler/Compiler.py`'s
/// `test_compiler_mutation_chained`, which asserts `args` but leaves `method` unconstrained.
/// `method='mutation'` is this repository's choice for that open slot: distinct from `'run'`
/// (which names an external service invocation and always carries a `container`), since this
/// instruction invokes no service at all.
fn mutation_line(value: Tree, mutations: &[Tree]) -> Result<BTreeMap<String, Instruction>, StoryError> {
    let mut args = vec![values(value)?];
    for m in mutations {
        args.push(Value::Operand(mutation(*m)?));
    }
    Ok(base("mutation", value.line(), None, Some(args), None, None))
}

/// `if_block(tree)` → `base('if', line, args=[path(if_statement)], enter=nested.line())`, its
/// `exit` set to the line of the first `elseif`/`else` sibling (if any), merged with the nested
/// body and each sibling's own emission. See `DESIGN.md`'s Open Question (a) resolution: an
/// `elseif`'s own `exit` points to its immediate next alternative, not the chain's final `else`.
fn if_block(tree: Tree) -> Result<BTreeMap<String, Instruction>, StoryError> {
    let children: Vec<Tree> = tree.children().collect();
    let if_statement = *children.get(0).ok_or(StoryError::internal("if-block"))?;
    let nested = *children.get(1).ok_or(StoryError::internal("if-block"))?;
    let cond = if_statement
        .child(0)
        .ok_or(StoryError::internal("if-block"))?;

    let siblings: Vec<Tree> = children[2..]
        .iter()
        .copied()
        .filter(|t| t.data() != AstNode::Null)
        .collect();
    let exit = siblings.first().map(|t| t.line());

    let mut out = base(
        "if",
        tree.line(),
        None,
        Some(vec![Value::Operand(path(cond))]),
        Some(nested.line()),
        exit,
    );
    out.extend(compile_block_list(nested)?);

    for (i, sibling) in siblings.iter().enumerate() {
        let sibling_exit = siblings.get(i + 1).map(|t| t.line());
        match sibling.data() {
            AstNode::ElseifBlock => out.extend(elseif_block(*sibling, sibling_exit)?),
            AstNode::ElseBlock => out.extend(else_block(*sibling)?),
            _ => return Err(StoryError::internal("if-block-sibling")),
        }
    }
    Ok(out)
}

/// `elseif_block(tree)` → `base('elif', line, args=[path], enter=nested.line())` with `exit`
/// supplied by the caller (`if_block`), merged with the nested body.
fn elseif_block(
    tree: Tree,
    exit: Option<usize>,
) -> Result<BTreeMap<String, Instruction>, StoryError> {
    let if_statement = tree.child(0).ok_or(StoryError::internal("elseif-block"))?;
    let nested = tree.child(1).ok_or(StoryError::internal("elseif-block"))?;
    let cond = if_statement
        .child(0)
        .ok_or(StoryError::internal("elseif-block"))?;
    let mut out = base(
        "elif",
        tree.line(),
        None,
        Some(vec![Value::Operand(path(cond))]),
        Some(nested.line()),
        exit,
    );
    out.extend(compile_block_list(nested)?);
    Ok(out)
}

/// `else_block(tree)` → `base('else', line, enter=nested.line())`, merged with the nested body.
/// Terminal: never carries an `exit`.
fn else_block(tree: Tree) -> Result<BTreeMap<String, Instruction>, StoryError> {
    let nested = tree.child(0).ok_or(StoryError::internal("else-block"))?;
    let mut out = base("else", tree.line(), None, None, Some(nested.line()), None);
    out.extend(compile_block_list(nested)?);
    Ok(out)
}

/// `for_block(tree)` → `base('for', line, args=[loop_var, path(iterable)], enter=nested.line())`.
fn for_block(tree: Tree) -> Result<BTreeMap<String, Instruction>, StoryError> {
    let for_statement = tree.child(0).ok_or(StoryError::internal("for-block"))?;
    let nested = tree.child(1).ok_or(StoryError::internal("for-block"))?;
    let loop_var = for_statement
        .child(0)
        .ok_or(StoryError::internal("for-block"))?
        .text()
        .to_string();
    let iterable = for_statement
        .child(1)
        .ok_or(StoryError::internal("for-block"))?;
    let args = vec![Value::Raw(loop_var), Value::Operand(path(iterable))];
    let mut out = base(
        "for",
        tree.line(),
        None,
        Some(args),
        Some(nested.line()),
        None,
    );
    out.extend(compile_block_list(nested)?);
    Ok(out)
}

/// `wait_block(tree)` → `base('wait', line, args=[path(condition)], enter=nested.line())`.
fn wait_block(tree: Tree) -> Result<BTreeMap<String, Instruction>, StoryError> {
    let wait_statement = tree.child(0).ok_or(StoryError::internal("wait-block"))?;
    let nested = tree.child(1).ok_or(StoryError::internal("wait-block"))?;
    let condition = wait_statement
        .child(0)
        .ok_or(StoryError::internal("wait-block"))?;
    let args = vec![Value::Operand(path(condition))];
    let mut out = base(
        "wait",
        tree.line(),
        None,
        Some(args),
        Some(nested.line()),
        None,
    );
    out.extend(compile_block_list(nested)?);
    Ok(out)
}

/// Dispatches one `Block`'s content to its emitter. `spec.md` §4.5 names eight recognized
/// productions, each of which is its own single tagged node here (so `children.len() == 1`); the
/// ninth, grammar-only case (a bare value optionally followed by mutations, see `mutation_line`)
/// has no single tag of its own, so it is recognized by the first child's tag being a value
/// variant instead and the remaining children (if any) treated as its mutation chain.
fn compile_block(block: Tree) -> Result<BTreeMap<String, Instruction>, StoryError> {
    let children: Vec<Tree> = block.children().collect();
    let head = *children.get(0).ok_or(StoryError::internal("block"))?;
    match head.data() {
        AstNode::Assignment => assignments(head),
        AstNode::Next => next(head),
        AstNode::Command => command(head),
        AstNode::IfBlock => if_block(head),
        AstNode::ForBlock => for_block(head),
        AstNode::WaitBlock => wait_block(head),
        AstNode::Expression | AstNode::List | AstNode::Dict | AstNode::Filepath => {
            mutation_line(head, &children[1..])
        }
        _ => Err(StoryError::internal("block-head")),
    }
}

/// Walks a `Start` or `NestedBlock` tree's `Block*` children (`subtree`/`subtrees` in the
/// original collapse into this one recursive helper — see the module doc comment).
fn compile_block_list(tree: Tree) -> Result<BTreeMap<String, Instruction>, StoryError> {
    let mut out = BTreeMap::new();
    for block in tree.children() {
        out.extend(compile_block(block)?);
    }
    Ok(out)
}

/// `parse_tree(root)`: walks the `start` tree and unions every top-level block's emission.
pub fn parse_tree(
    root: &crate::ASTNode<AstNode>,
    code: &Code,
) -> Result<BTreeMap<String, Instruction>, StoryError> {
    compile_block_list(Tree::new(root, code))
}

/// `compile(tree)`: serializes `{version, script, entrypoint}`.
pub fn compile(root: &crate::ASTNode<AstNode>, code: &Code, version: &str) -> Result<Script, StoryError> {
    let script = parse_tree(root, code)?;
    Ok(Script::from_instructions(version.to_string(), script))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_quotes_only_strips_a_matching_pair() {
        assert_eq!(strip_quotes("\"hi\""), "hi");
        assert_eq!(strip_quotes("hi"), "hi");
        assert_eq!(strip_quotes("\""), "\"");
    }

    #[test]
    fn operator_name_covers_the_full_table() {
        let table = [
            ("+", "sum"),
            ("-", "subtraction"),
            ("*", "multiplication"),
            ("/", "division"),
            ("%", "modulus"),
            ("==", "equals"),
            ("!=", "not_equal"),
            ("<", "less"),
            (">", "greater"),
            ("<=", "less_equal"),
            (">=", "greater_equal"),
            ("and", "and"),
            ("or", "or"),
        ];
        for (lexeme, word) in table {
            assert_eq!(operator_name(lexeme).unwrap(), word);
        }
    }

    #[test]
    fn operator_name_rejects_unknown_lexeme() {
        assert!(operator_name("~").is_err());
    }
}
