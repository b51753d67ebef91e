/// Table model extraction from the pg_query statement list.
pub mod ddl_walker;
/// Recursive resolution of `DEFAULT` expressions.
pub mod default_expr;
/// Path-based access to the pg_query JSON document and constraint codes.
pub mod tree;
