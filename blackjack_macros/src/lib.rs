use proc_macro::TokenStream as TokenStream1;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote, ToTokens};
use syn::{self, parse_quote};

/// This macro is added before a transition method of `GameState` in the impl block.
/// Use this macro to first check if it is exactly the turn in the attribute.
///
/// For example, `#[allowed_turn(Dealer)]` will make a method first check
/// if `self.turn` is `Turn::Dealer`. If not, the method returns
/// `Err(GameError::WrongTurn { .. })` without touching the state.
///
/// The annotated method must return `Result<_, GameError>`, and both `Turn`
/// and `GameError` must be in scope where it is defined.
#[proc_macro_attribute]
pub fn allowed_turn(attr: TokenStream1, item: TokenStream1) -> TokenStream1 {
    let mut ast: syn::ImplItemFn = match syn::parse(item) {
        Ok(ast) => ast,
        Err(err) => return err.to_compile_error().into(),
    };
    let turn: syn::Ident = match syn::parse(attr) {
        Ok(turn) => turn,
        Err(err) => return err.to_compile_error().into(),
    };
    if turn != "Player" && turn != "Dealer" {
        return syn::Error::new(turn.span(), "allowed_turn expects `Player` or `Dealer`")
            .to_compile_error()
            .into();
    }

    let operation = ast.sig.ident.to_string();
    let early_return = turn_guard(&operation, &turn);
    let early_return: syn::Stmt = parse_quote!(#early_return);
    ast.block.stmts.insert(0, early_return);
    ast.into_token_stream().into()
}

fn turn_guard(operation: &str, turn: &syn::Ident) -> TokenStream2 {
    let variant = format_ident!("{}", turn.to_string());
    quote! {
        if self.turn != Turn::#variant {
            return Err(GameError::WrongTurn {
                operation: #operation,
                expected: Turn::#variant,
                actual: self.turn,
            });
        }
    }
}
