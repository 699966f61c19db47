use darling::FromMeta;
use proc_macro::{self, TokenStream};
use quote::quote;
use syn::{parse_macro_input, AttributeArgs, Fields, Ident, ItemStruct};

#[derive(Debug, FromMeta)]
struct PacketArgs {
    size: usize,
}

/// Turns a struct into a wire packet.
///
/// The struct must start with a `header: Header` field. Field order is the
/// wire order; the serde derives emitted here are what the big-endian codec
/// in `beacon_net::ser`/`beacon_net::de` walks.
#[proc_macro_attribute]
pub fn packet(args: TokenStream, item: TokenStream) -> TokenStream {
    let parsed_args = parse_macro_input!(args as AttributeArgs);

    let args = match PacketArgs::from_list(&parsed_args) {
        Ok(v) => v,
        Err(e) => {
            return TokenStream::from(e.write_errors());
        }
    };

    let main_struct = parse_macro_input!(item as ItemStruct);
    let main_ident = &main_struct.ident;

    let has_header = match &main_struct.fields {
        Fields::Named(fields) => fields
            .named
            .first()
            .and_then(|f| f.ident.as_ref())
            .map_or(false, |ident| ident == "header"),
        _ => false,
    };

    if !has_header {
        return syn::Error::new_spanned(
            &main_struct.ident,
            "packet structs must begin with a named `header` field",
        )
        .to_compile_error()
        .into();
    }

    let packet_impl = packet_impl(main_ident, args.size);

    let output = quote! {
        #[derive(::serde::Serialize, ::serde::Deserialize)]
        #main_struct

        #packet_impl
    };

    output.into()
}

fn packet_impl(ident: &Ident, size: usize) -> proc_macro2::TokenStream {
    quote! {
        impl crate::packets::Packet for #ident {
            const SIZE: usize = #size;

            fn header(&self) -> &crate::packets::Header {
                &self.header
            }

            fn header_mut(&mut self) -> &mut crate::packets::Header {
                &mut self.header
            }
        }
    }
}
