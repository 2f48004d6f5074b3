use proc_macro::TokenStream;
use quote::quote_spanned;
use syn::{ItemFn, LitInt, parse_macro_input, spanned::Spanned};

/// Fails the test if its body does not finish within the given number of
/// milliseconds.
///
/// The body runs on a separate thread. A panic inside it is propagated as-is;
/// a body that never returns (a deadlock) is reported as a panic of the test
/// thread once the deadline passes. The stuck thread is left behind.
#[proc_macro_attribute]
pub fn deadline(attr: TokenStream, item: TokenStream) -> TokenStream {
    let millis = parse_macro_input!(attr as LitInt);
    let mut input_fn = parse_macro_input!(item as ItemFn);
    let block = *input_fn.block;
    *input_fn.block = syn::parse_quote! {
        {
            fn _f() {}
            fn _get_name<T>(_: T) -> &'static str {
                let n = core::any::type_name::<T>();
                &n[..n.len() - 4]
            }
            let (done_tx, done_rx) = std::sync::mpsc::channel::<()>();
            let worker = std::thread::Builder::new()
                .name(_get_name(_f).into())
                .spawn(move || {
                    let _return_val = (move || { #block })();
                    let _ = done_tx.send(());
                    _return_val
                })
                .expect("Grader: failed to spawn the test body");
            match done_rx.recv_timeout(std::time::Duration::from_millis(#millis)) {
                Err(std::sync::mpsc::RecvTimeoutError::Timeout) => panic!(
                    "Grader: `{}` did not finish within {} ms. Deadlock?",
                    _get_name(_f),
                    #millis
                ),
                _ => match worker.join() {
                    Ok(v) => v,
                    Err(payload) => std::panic::resume_unwind(payload),
                },
            }
        }
    };
    TokenStream::from(quote_spanned! { input_fn.span() =>
        #input_fn
    })
}

/// Runs the test body the given number of times in a row.
#[proc_macro_attribute]
pub fn repeat(attr: TokenStream, item: TokenStream) -> TokenStream {
    let times = parse_macro_input!(attr as LitInt);
    let mut input_fn = parse_macro_input!(item as ItemFn);
    let block = *input_fn.block;
    *input_fn.block = syn::parse_quote! {
        {
            for _iteration in 0..#times {
                (|| { #block })();
            }
        }
    };
    TokenStream::from(quote_spanned! { input_fn.span() =>
        #input_fn
    })
}
