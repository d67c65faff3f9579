use crate::{
    ast::{
        ast::{ExprKind, NodeId, NodeKind, StmtKind, TreeNode},
        types::{Attribute, DataType},
    },
    errors::errors::Error,
    lexer::tokens::{Token, TokenKind},
    parser::{expr::parse_expr, lookups::BindingPower},
};

use super::parser::Parser;

fn parse_type_specifier(parser: &mut Parser) -> Result<(Token, DataType), Error> {
    match DataType::from_token(parser.current_token_kind()) {
        Some(data_type) => Ok((parser.advance().clone(), data_type)),
        None => Err(parser.unexpected("expected `int` or `void`")),
    }
}

fn parse_identifier(parser: &mut Parser) -> Result<Token, Error> {
    let error = parser.unexpected("expected identifier");
    parser.expect_error(TokenKind::Identifier, Some(error))
}

/// Top-level declaration: a variable, an array, or a function definition.
///
/// Produces a `Type` node whose first child is the declared `Var` or `Func`.
pub fn parse_declaration(parser: &mut Parser) -> Result<NodeId, Error> {
    let (type_token, data_type) = parse_type_specifier(parser)?;
    let identifier = parse_identifier(parser)?;

    let declared = if parser.current_token_kind() == TokenKind::OpenParen {
        parse_fn_decl(parser, identifier, data_type)?
    } else {
        parse_var_decl(parser, identifier, data_type)?
    };

    let type_node = parser.add_node(
        TreeNode::new(NodeKind::Expr(ExprKind::Type), Attribute::Name(type_token.value.clone()), type_token.line())
            .with_type(data_type),
    );
    parser.tree_mut().set_child(type_node, 0, Some(declared));

    Ok(type_node)
}

/// Local declarations only allow variables and arrays.
fn parse_local_declaration(parser: &mut Parser) -> Result<NodeId, Error> {
    let (type_token, data_type) = parse_type_specifier(parser)?;
    let identifier = parse_identifier(parser)?;

    if parser.current_token_kind() == TokenKind::OpenParen {
        return Err(parser.unexpected("functions cannot be declared inside a function body"));
    }

    let declared = parse_var_decl(parser, identifier, data_type)?;

    let type_node = parser.add_node(
        TreeNode::new(NodeKind::Expr(ExprKind::Type), Attribute::Name(type_token.value.clone()), type_token.line())
            .with_type(data_type),
    );
    parser.tree_mut().set_child(type_node, 0, Some(declared));

    Ok(type_node)
}

fn parse_var_decl(parser: &mut Parser, identifier: Token, data_type: DataType) -> Result<NodeId, Error> {
    let var = parser.add_node(
        TreeNode::new(NodeKind::Expr(ExprKind::Var), Attribute::Name(identifier.value.clone()), identifier.line())
            .with_type(data_type),
    );

    if parser.current_token_kind() == TokenKind::OpenBracket {
        parser.advance();

        if parser.current_token_kind() != TokenKind::Number {
            return Err(parser.unexpected("expected array length"));
        }
        let length = parse_expr(parser, BindingPower::Primary)?;
        parser.expect(TokenKind::CloseBracket)?;

        parser.tree_mut().set_child(var, 0, Some(length));
    }

    parser.expect(TokenKind::Semicolon)?;

    Ok(var)
}

fn parse_fn_decl(parser: &mut Parser, identifier: Token, return_type: DataType) -> Result<NodeId, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let params = parse_params(parser)?;
    parser.expect(TokenKind::CloseParen)?;

    if parser.current_token_kind() != TokenKind::OpenCurly {
        return Err(parser.unexpected("expected function body"));
    }
    let body = parse_compound_stmt(parser)?;

    let func = parser.add_node(
        TreeNode::new(NodeKind::Expr(ExprKind::Func), Attribute::Name(identifier.value.clone()), identifier.line())
            .with_type(return_type),
    );
    parser.tree_mut().set_child(func, 0, params);
    parser.tree_mut().set_child(func, 1, body);

    Ok(func)
}

/// `void`, nothing, or a comma separated list of `type name` / `type name[]`.
fn parse_params(parser: &mut Parser) -> Result<Option<NodeId>, Error> {
    if parser.current_token_kind() == TokenKind::CloseParen {
        return Ok(None);
    }

    if parser.current_token_kind() == TokenKind::Void && parser.peek_kind() == TokenKind::CloseParen {
        parser.advance();
        return Ok(None);
    }

    let mut params = vec![];
    loop {
        let (_, data_type) = parse_type_specifier(parser)?;
        let identifier = parse_identifier(parser)?;

        if parser.current_token_kind() == TokenKind::OpenBracket {
            parser.advance();
            parser.expect(TokenKind::CloseBracket)?;
        }

        params.push(parser.add_node(
            TreeNode::new(NodeKind::Expr(ExprKind::Param), Attribute::Name(identifier.value.clone()), identifier.line())
                .with_type(data_type),
        ));

        if parser.current_token_kind() != TokenKind::Comma {
            break;
        }
        parser.advance();
    }

    Ok(parser.tree_mut().link_siblings(&params))
}

pub fn parse_stmt(parser: &mut Parser) -> Result<Option<NodeId>, Error> {
    if let Some(handler) = parser.get_stmt_lookup().get(&parser.current_token_kind()).copied() {
        return handler(parser);
    }

    let expr = parse_expr(parser, BindingPower::Default)?;

    parser.expect(TokenKind::Semicolon)?;

    Ok(Some(expr))
}

pub fn parse_empty_stmt(parser: &mut Parser) -> Result<Option<NodeId>, Error> {
    parser.expect(TokenKind::Semicolon)?;
    Ok(None)
}

/// `{ local declarations, statements }`
pub fn parse_compound_stmt(parser: &mut Parser) -> Result<Option<NodeId>, Error> {
    let start = parser.expect(TokenKind::OpenCurly)?;

    let mut declarations = vec![];
    while matches!(parser.current_token_kind(), TokenKind::Int | TokenKind::Void) {
        declarations.push(parse_local_declaration(parser)?);
    }

    let mut statements = vec![];
    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return Err(parser.unexpected("expected `}`"));
        }
        if let Some(stmt) = parse_stmt(parser)? {
            statements.push(stmt);
        }
    }

    parser.expect(TokenKind::CloseCurly)?;

    let declarations = parser.tree_mut().link_siblings(&declarations);
    let statements = parser.tree_mut().link_siblings(&statements);

    let compound = parser.add_node(TreeNode::new(NodeKind::Stmt(StmtKind::Compound), Attribute::None, start.line()));
    parser.tree_mut().set_child(compound, 0, declarations);
    parser.tree_mut().set_child(compound, 1, statements);

    Ok(Some(compound))
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Option<NodeId>, Error> {
    let start = parser.advance().clone();

    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    let then_body = parse_stmt(parser)?;

    let else_body = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        parse_stmt(parser)?
    } else {
        None
    };

    let if_stmt = parser.add_node(TreeNode::new(NodeKind::Stmt(StmtKind::If), Attribute::None, start.line()));
    parser.tree_mut().set_child(if_stmt, 0, Some(condition));
    parser.tree_mut().set_child(if_stmt, 1, then_body);
    parser.tree_mut().set_child(if_stmt, 2, else_body);

    Ok(Some(if_stmt))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Option<NodeId>, Error> {
    let start = parser.advance().clone();

    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    let body = parse_stmt(parser)?;

    let while_stmt = parser.add_node(TreeNode::new(NodeKind::Stmt(StmtKind::While), Attribute::None, start.line()));
    parser.tree_mut().set_child(while_stmt, 0, Some(condition));
    parser.tree_mut().set_child(while_stmt, 1, body);

    Ok(Some(while_stmt))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Option<NodeId>, Error> {
    let start = parser.advance().clone();

    let value = if parser.current_token_kind() != TokenKind::Semicolon {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon)?;

    let return_stmt = parser.add_node(TreeNode::new(NodeKind::Stmt(StmtKind::Return), Attribute::None, start.line()));
    parser.tree_mut().set_child(return_stmt, 0, value);

    Ok(Some(return_stmt))
}
