use crate::{
    ast::{
        ast::{ExprKind, NodeId, NodeKind, StmtKind, TreeNode},
        types::Attribute,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<NodeId, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None => return Err(Error::new(ErrorImpl::UnexpectedToken { token: parser.current_token().value.clone() }, parser.get_position())),
    };

    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    while let Some(&next_bp) = parser.get_bp_lookup().get(&parser.current_token_kind()) {
        if next_bp <= bp {
            break;
        }

        let token_kind = parser.current_token_kind();
        let led = match parser.get_led_lookup().get(&token_kind) {
            Some(led) => *led,
            None => return Err(Error::new(ErrorImpl::UnexpectedToken { token: parser.current_token().value.clone() }, parser.get_position())),
        };

        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    match parser.current_token_kind() {
        TokenKind::Number => {
            let value = match parser.current_token().value.parse::<i64>() {
                Ok(value) => value,
                Err(_) => return Err(Error::new(ErrorImpl::NumberParseError { token: parser.current_token().value.clone() }, parser.get_position())),
            };
            let line = parser.advance().line();

            Ok(parser.add_node(TreeNode::new(NodeKind::Expr(ExprKind::Const), Attribute::Value(value), line)))
        },
        TokenKind::Identifier => {
            let token = parser.advance().clone();
            let line = token.line();

            Ok(parser.add_node(TreeNode::new(NodeKind::Expr(ExprKind::Id), Attribute::Name(token.value), line)))
        },
        _ => {
            Err(Error::new(ErrorImpl::UnexpectedToken { token: parser.current_token().value.clone() }, parser.get_position()))
        }
    }
}

pub fn parse_binary_expr(parser: &mut Parser, left: NodeId, bp: BindingPower) -> Result<NodeId, Error> {
    let operator_token = parser.advance().clone();

    let right = parse_expr(parser, bp)?;

    let op = parser.add_node(TreeNode::new(NodeKind::Expr(ExprKind::Op), Attribute::Operator(operator_token.kind), operator_token.line()));
    parser.tree_mut().set_child(op, 0, Some(left));
    parser.tree_mut().set_child(op, 1, Some(right));

    Ok(op)
}

/// `var = expr`, right associative. The target must be a plain or indexed variable.
pub fn parse_assignment_expr(parser: &mut Parser, left: NodeId, _bp: BindingPower) -> Result<NodeId, Error> {
    if !parser.tree().node(left).kind.is_expr(ExprKind::Id) {
        return Err(parser.unexpected("expected a variable on the left of `=`"));
    }

    let operator_token = parser.advance().clone();
    let rhs = parse_expr(parser, BindingPower::Default)?;

    let assign = parser.add_node(TreeNode::new(NodeKind::Stmt(StmtKind::Assign), Attribute::None, operator_token.line()));
    parser.tree_mut().set_child(assign, 0, Some(left));
    parser.tree_mut().set_child(assign, 1, Some(rhs));

    Ok(assign)
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

/// `name(args)`: the identifier node becomes a `Call` whose first child is the argument chain.
pub fn parse_call_expr(parser: &mut Parser, left: NodeId, _bp: BindingPower) -> Result<NodeId, Error> {
    let callee = parser.tree().node(left);
    if !callee.kind.is_expr(ExprKind::Id) || callee.child(0).is_some() {
        return Err(parser.unexpected("only named functions can be called"));
    }

    parser.advance();

    let mut args = vec![];
    while parser.current_token_kind() != TokenKind::CloseParen {
        if !args.is_empty() {
            parser.expect(TokenKind::Comma)?;
        }
        args.push(parse_expr(parser, BindingPower::Default)?);
    }

    parser.expect(TokenKind::CloseParen)?;

    let args = parser.tree_mut().link_siblings(&args);
    let call = parser.tree_mut().node_mut(left);
    call.kind = NodeKind::Expr(ExprKind::Call);
    call.children[0] = args;

    Ok(left)
}

/// `name[expr]`: the index becomes the identifier's first child.
pub fn parse_index_expr(parser: &mut Parser, left: NodeId, _bp: BindingPower) -> Result<NodeId, Error> {
    let array = parser.tree().node(left);
    if !array.kind.is_expr(ExprKind::Id) || array.child(0).is_some() {
        return Err(parser.unexpected("only variables can be indexed"));
    }

    parser.advance();
    let index = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseBracket)?;

    parser.tree_mut().set_child(left, 0, Some(index));

    Ok(left)
}
